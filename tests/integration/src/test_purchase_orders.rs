//! Purchase order scenarios.

#[cfg(test)]
mod tests {
    use qbxml_core::RequestKind;
    use qbxml_model::{FilterSpec, Value};

    use crate::fixture_client;

    fn line_ids(record: &qbxml_model::NormalizedRecord) -> Vec<&str> {
        record
            .line_items()
            .filter_map(|line| line.get_str("TxnLineID"))
            .collect()
    }

    #[test]
    fn test_should_keep_gifting_orders_with_lines() {
        let client = fixture_client("purchase_order_query_rs.xml");
        let records = client
            .query(&RequestKind::PurchaseOrder, FilterSpec::default())
            .expect("purchase order query should succeed");

        let refs: Vec<_> = records
            .iter()
            .filter_map(|r| r.get("RefNumber").and_then(Value::as_str))
            .collect();
        assert_eq!(refs, vec!["PO-5001", "PO-5004"]);
    }

    #[test]
    fn test_should_consolidate_lines_in_encounter_order() {
        let client = fixture_client("purchase_order_query_rs.xml");
        let records = client
            .query(&RequestKind::PurchaseOrder, FilterSpec::default())
            .expect("purchase order query should succeed");

        assert_eq!(
            line_ids(&records[0]),
            vec![
                "2A12-1709251200",
                "2A13-1709251200",
                "2A15-1709251200",
                "2A16-1709251200",
                "2A17-1709251200",
            ]
        );
        assert_eq!(line_ids(&records[1]), vec!["2A43-1709510400"]);
    }

    #[test]
    fn test_should_serialize_records_with_po_lines() {
        let client = fixture_client("purchase_order_query_rs.xml");
        let records = client
            .query(&RequestKind::PurchaseOrder, FilterSpec::default())
            .expect("purchase order query should succeed");

        let json = serde_json::to_value(&records[1]).expect("record should serialize");
        assert_eq!(json["TxnID"], "2A40-1709510400");
        assert_eq!(json["ClassRef"]["FullName"], "Gifting");
        assert_eq!(json["po_lines"][0]["ItemRef"]["FullName"], "Balloons");
    }
}
