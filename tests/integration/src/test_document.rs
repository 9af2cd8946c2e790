//! Document and table-schema integration tests.

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use bytes::Bytes;
    use ferrosdk_dynamodb_enhanced::{
        Document, DocumentError, EnhancedType, SdkNumber, TableSchema,
    };
    use ferrosdk_dynamodb_model::{AttributeMap, AttributeValue, KeyType, ScalarAttributeType};
    use indexmap::IndexMap;

    use crate::init_tracing;
    use crate::memory_table::{InMemoryTable, TableError, composite_schema};

    fn table() -> InMemoryTable {
        init_tracing();
        InMemoryTable::new(composite_schema())
    }

    fn key(pk: &str, sk: i64) -> Document {
        Document::builder()
            .put_string("pk", pk)
            .put_number("sk", sk)
            .build()
            .expect("key")
    }

    #[test]
    fn test_should_store_and_load_document() {
        let table = table();
        let scores: IndexMap<String, i64> =
            [("math".to_owned(), 90), ("art".to_owned(), 75)].into_iter().collect();
        let item = key("user#1", 1)
            .to_builder()
            .put_string("name", "Ada")
            .put_boolean("active", true)
            .put_bytes("avatar", Bytes::from_static(b"\x89PNG"))
            .put_number_set("lucky", [7, 13])
            .put_map("scores", scores.clone(), &EnhancedType::of(), &EnhancedType::of())
            .put_null("nickname")
            .build()
            .expect("item");
        table.put_item(&item).expect("put");
        assert_eq!(table.len(), 1);

        let loaded = table.get_item(&key("user#1", 1)).expect("get").expect("present");
        assert_eq!(loaded.get_string("name").unwrap().as_deref(), Some("Ada"));
        assert_eq!(loaded.get_boolean("active").unwrap(), Some(true));
        assert_eq!(
            loaded.get_bytes("avatar").unwrap(),
            Some(Bytes::from_static(b"\x89PNG"))
        );
        let lucky: Vec<String> = loaded
            .get_number_set("lucky")
            .unwrap()
            .expect("lucky")
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(lucky, ["7", "13"]);
        assert_eq!(
            loaded
                .get_map("scores", &EnhancedType::of(), &EnhancedType::<i64>::of())
                .unwrap(),
            Some(scores)
        );
        // NULL attributes are dropped on write.
        assert!(!loaded.is_present("nickname"));
    }

    #[test]
    fn test_should_distinguish_items_by_sort_key() {
        let table = table();
        for sk in 1..=3 {
            let item = key("order", sk)
                .to_builder()
                .put_number("qty", sk * 10)
                .build()
                .unwrap();
            table.put_item(&item).unwrap();
        }
        assert_eq!(table.len(), 3);

        let second = table.get_item(&key("order", 2)).unwrap().unwrap();
        assert_eq!(second.get("qty", &EnhancedType::<i64>::of()).unwrap(), Some(20));
        assert!(table.get_item(&key("order", 4)).unwrap().is_none());
    }

    #[test]
    fn test_should_replace_item_with_same_key() {
        let table = table();
        let first = key("k", 1).to_builder().put_string("v", "old").build().unwrap();
        let second = key("k", 1).to_builder().put_string("v", "new").build().unwrap();
        table.put_item(&first).unwrap();
        table.put_item(&second).unwrap();

        assert_eq!(table.len(), 1);
        let loaded = table.get_item(&key("k", 1)).unwrap().unwrap();
        assert_eq!(loaded.get_string("v").unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn test_should_reject_items_without_valid_keys() {
        let table = table();
        let missing = Document::builder().put_string("pk", "x").build().unwrap();
        assert!(matches!(table.put_item(&missing), Err(TableError::MissingKey(k)) if k == "sk"));

        let wrong_type = Document::builder()
            .put_string("pk", "x")
            .put_string("sk", "1")
            .build()
            .unwrap();
        assert!(matches!(
            table.put_item(&wrong_type),
            Err(TableError::KeyTypeMismatch(k)) if k == "sk"
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_should_project_selected_attributes() {
        let table = table();
        let item = key("p", 9)
            .to_builder()
            .put_string("a", "1")
            .put_string("b", "2")
            .build()
            .unwrap();
        table.put_item(&item).unwrap();

        let projected = table
            .project(&key("p", 9), &["b", "pk", "absent"])
            .unwrap()
            .unwrap();
        let names: Vec<&str> = projected.keys().map(String::as_str).collect();
        assert_eq!(names, ["b", "pk"]);
    }

    #[test]
    fn test_should_describe_table_keys() {
        let table = table();
        let metadata = table.schema().table_metadata();
        let schema = metadata.primary_key_schema().unwrap();
        assert_eq!(schema[0].attribute_name, "pk");
        assert_eq!(schema[0].key_type, KeyType::Hash);
        assert_eq!(schema[1].attribute_name, "sk");
        assert_eq!(schema[1].key_type, KeyType::Range);

        let definitions = metadata.attribute_definitions();
        assert!(definitions.iter().any(|d| d.attribute_name == "sk"
            && d.attribute_type == ScalarAttributeType::N));
        assert!(matches!(
            table.schema().converter_for_attribute("pk"),
            Err(DocumentError::UnsupportedOperation(_))
        ));
    }

    #[test]
    fn test_should_keep_wire_format_through_storage() {
        let table = table();
        let item = key("wire", 1)
            .to_builder()
            .put_json("payload", r#"{"list":[1,"two",null],"flag":false}"#)
            .build()
            .unwrap();
        table.put_item(&item).unwrap();

        let loaded = table.get_item(&key("wire", 1)).unwrap().unwrap();
        let map = table.schema().item_to_map(&loaded, false).unwrap();
        let wire = serde_json::to_value(&map["payload"]).unwrap();
        assert_eq!(
            wire,
            serde_json::json!({"M": {
                "list": {"L": [{"N": "1"}, {"S": "two"}, {"NULL": true}]},
                "flag": {"BOOL": false}
            }})
        );
        let back: AttributeValue = serde_json::from_value(wire).unwrap();
        assert_eq!(back, map["payload"]);
    }

    #[test]
    fn test_should_render_null_attributes_in_json_and_wire_form() {
        let doc = Document::builder().put_null("nullKey").build().unwrap();
        assert_eq!(doc.to_json().unwrap(), r#"{"nullKey":null}"#);

        let map: AttributeMap = doc.to_attribute_value_map().unwrap();
        assert_eq!(map["nullKey"], AttributeValue::Null(true));
        assert_eq!(doc.get_string("nullKey").unwrap(), None);
        assert!(doc.is_null("nullKey"));
    }

    #[test]
    fn test_should_render_numbers_from_any_numeric_type() {
        let doc = Document::builder()
            .add("numberKey", 10)
            .add("bigDecimalNumberKey", BigDecimal::from(10))
            .build()
            .unwrap();
        assert_eq!(
            doc.to_json().unwrap(),
            r#"{"numberKey":10,"bigDecimalNumberKey":10}"#
        );

        let precise = BigDecimal::from_str("12345678901234567890.123456789").unwrap();
        let doc = Document::builder()
            .put_number("n", SdkNumber::from(&precise))
            .build()
            .unwrap();
        assert_eq!(doc.get_big_decimal("n").unwrap(), Some(precise));
    }

    #[test]
    fn test_should_survive_json_round_trip_through_table() {
        let table = table();
        let json = r#"{"pk":"json","sk":5,"nested":{"deep":[1.5,{"x":"y"}]},"ok":true}"#;
        let doc = Document::from_json(json).unwrap().unwrap();
        table.put_item(&doc).unwrap();

        let loaded = table.get_item(&key("json", 5)).unwrap().unwrap();
        assert_eq!(loaded.to_json().unwrap(), json);
        let nested = loaded.get_map_as_document("nested").unwrap().unwrap();
        assert_eq!(nested.get_json("deep").unwrap().as_deref(), Some(r#"[1.5,{"x":"y"}]"#));
    }
}
