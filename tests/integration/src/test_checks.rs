//! Check query scenarios.

#[cfg(test)]
mod tests {
    use qbxml_core::RequestKind;
    use qbxml_model::{FilterSpec, Value};

    use crate::fixture_client;

    #[test]
    fn test_should_query_checks_over_day_count() {
        let client = fixture_client("check_query_rs.xml");

        let records = client
            .query(&RequestKind::Check, FilterSpec::builder().days(20).build())
            .expect("check query should succeed");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("RefNumber"), Some(&Value::from("10442")));
        assert_eq!(
            records[0].fields().get_path(&["PayeeEntityRef", "FullName"]),
            Some(&Value::from("Smith & Sons Distributing"))
        );
        assert_eq!(
            records[1]
                .fields()
                .get_path(&["AccountRef", "FullName"])
                .and_then(Value::as_str),
            Some("SOC Distributor Bonus Account:SOC Bonus Cleared")
        );

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.starts_with("<?xml version=\"1.0\"?>"));
        assert!(request.contains("<?qbxml version=\"13.0\"?>"));
        assert!(request.contains("<QBXMLMsgsRq onError=\"stopOnError\">"));
        assert!(request.contains("<FromModifiedDate>2024-02-24</FromModifiedDate>"));
        assert!(!request.contains("ToModifiedDate"));
        assert_eq!(request.matches("<FullName>").count(), 3);
    }

    #[test]
    fn test_should_order_check_request_entries() {
        let client = fixture_client("check_query_rs.xml");
        client
            .query(&RequestKind::Check, FilterSpec::default())
            .expect("check query should succeed");

        let request = &client.transport().requests()[0];
        let range = request.find("<ModifiedDateRangeFilter>").expect("date range");
        let accounts = request.find("<AccountFilter>").expect("account filter");
        let line_items = request
            .find("<IncludeLineItems>true</IncludeLineItems>")
            .expect("line item flag");
        assert!(range < accounts && accounts < line_items);
        assert!(request.contains("<FromModifiedDate>2024-02-14</FromModifiedDate>"));
    }

    #[test]
    fn test_should_look_up_checks_by_txn_id_only() {
        let client = fixture_client("check_query_rs.xml");
        let spec = FilterSpec::builder()
            .txn_ids(vec!["1F3C-1711382400".to_owned(), "1F41-1711468800".to_owned()])
            .ref_numbers(vec!["10442".to_owned()])
            .days(5)
            .build();

        client
            .query(&RequestKind::Check, spec)
            .expect("check query should succeed");

        let request = &client.transport().requests()[0];
        assert_eq!(request.matches("<TxnID>").count(), 2);
        assert!(!request.contains("RefNumber"));
        assert!(!request.contains("ModifiedDateRangeFilter"));
        assert!(!request.contains("AccountFilter"));
        assert!(request.contains("<IncludeLineItems>true</IncludeLineItems>"));
    }

    #[test]
    fn test_should_pluralize_single_check() {
        let client = fixture_client("check_query_single_rs.xml");
        let records = client
            .query(&RequestKind::Check, FilterSpec::default())
            .expect("check query should succeed");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("TxnID"), Some(&Value::from("1F3C-1711382400")));
    }
}
