//! Codec round trips through saved documents.

#[cfg(test)]
mod tests {
    use qbxml_core::{GenericQuery, QbxmlConfig, QueryStrategy, format_request};
    use qbxml_model::{OrderedStruct, Value};

    use crate::fixture_client;

    fn check(number: i64) -> OrderedStruct {
        OrderedStruct::new()
            .with("TxnID", format!("T-{number}"))
            .with("RefNumber", number)
            .with("Memo", "Bonus <Q1> & more")
    }

    #[test]
    fn test_should_round_trip_repeated_entities() {
        let body = OrderedStruct::new().with("CheckRet", vec![check(1), check(2), check(3)]);
        let xml = format_request(&QbxmlConfig::default(), "CheckQueryRs", &body)
            .expect("format should succeed");

        let envelope = qbxml_xml::decode(&xml).expect("decode should succeed");
        let query = GenericQuery::new("CheckQueryRq", "CheckQueryRs").with_element_label("CheckRet");
        let records: Vec<_> = query
            .normalize(&envelope)
            .expect("section present")
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].get("RefNumber"), Some(&Value::from("3")));
        assert_eq!(
            records[0].get("Memo"),
            Some(&Value::from("Bonus <Q1> & more"))
        );
    }

    #[test]
    fn test_should_preserve_sibling_order_through_decode() {
        let body = OrderedStruct::new()
            .with("Zeta", "1")
            .with("Alpha", "2")
            .with("Mid", OrderedStruct::new().with("B", "x").with("A", "y"));
        let xml = format_request(&QbxmlConfig::default(), "OrderRs", &body)
            .expect("format should succeed");

        let envelope = qbxml_xml::decode(&xml).expect("decode should succeed");
        assert_eq!(
            envelope.body.keys().collect::<Vec<_>>(),
            vec!["Zeta", "Alpha", "Mid"]
        );
        let mid = envelope
            .body
            .get("Mid")
            .and_then(Value::as_struct)
            .expect("nested struct");
        assert_eq!(mid.keys().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn test_should_fetch_preferences() {
        let client = fixture_client("preferences_query_rs.xml");
        let prefs = client
            .preferences()
            .expect("preferences should succeed")
            .expect("preferences present");

        assert_eq!(
            prefs
                .fields()
                .get_path(&["PurchasesAndVendorsPreferences", "DaysBillsAreDue"]),
            Some(&Value::from("10"))
        );
        assert!(client.transport().requests()[0].contains("<PreferencesQueryRq/>"));
    }

    #[test]
    fn test_should_dump_formatted_requests() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let config = QbxmlConfig::builder().dump_dir(dir.path()).build();
        let client = crate::fixture_client_with(config, "check_query_rs.xml");

        let xml = client
            .format_request("CheckQueryRq", &OrderedStruct::new())
            .expect("format should succeed");

        let dumped: Vec<_> = std::fs::read_dir(dir.path())
            .expect("dump dir readable")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(dumped.len(), 1);
        let name = dumped[0].file_name().to_string_lossy().into_owned();
        assert!(name.ends_with("CheckQueryRq-request.xml"));
        assert_eq!(
            std::fs::read(dumped[0].path()).expect("dump readable"),
            xml.to_vec()
        );
    }
}
