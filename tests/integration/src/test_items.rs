//! Item query scenarios.

#[cfg(test)]
mod tests {
    use qbxml_core::{QbxmlConfig, RequestKind};
    use qbxml_model::FilterSpec;

    use crate::{fixture_client, fixture_client_with};

    #[test]
    fn test_should_stamp_item_categories() {
        let client = fixture_client("item_query_rs.xml");
        let records = client
            .query(&RequestKind::Item, FilterSpec::builder().days(1).build())
            .expect("item query should succeed");

        let categories: Vec<_> = records.iter().filter_map(|r| r.category()).collect();
        assert_eq!(
            categories,
            vec![
                "ItemInventoryRet",
                "ItemInventoryRet",
                "ItemServiceRet",
                "ItemGroupRet"
            ]
        );
    }

    #[test]
    fn test_should_send_flat_item_date_range() {
        let client = fixture_client("item_query_rs.xml");
        let end = chrono::NaiveDate::from_ymd_opt(2024, 3, 10).expect("valid date");
        let spec = FilterSpec::builder()
            .days(1)
            .end_date(end)
            .account_names(vec!["Checking".to_owned()])
            .build();

        client
            .query(&RequestKind::Item, spec)
            .expect("item query should succeed");

        let request = &client.transport().requests()[0];
        assert!(request.contains("<FromModifiedDate>2024-03-14</FromModifiedDate>"));
        assert!(request.contains("<ToModifiedDate>2024-03-10</ToModifiedDate>"));
        assert!(!request.contains("ModifiedDateRangeFilter"));
        assert!(request.contains("<AccountFilter>"));
        assert!(request.contains("<FullName>Checking</FullName>"));
        assert!(!request.contains("IncludeLineItems"));
    }

    #[test]
    fn test_should_honor_configured_category_pattern() {
        let config = QbxmlConfig::builder()
            .item_category_pattern("^Item(Inventory|Service)Ret$".into())
            .build();
        let client = fixture_client_with(config, "item_query_rs.xml");

        let records = client
            .query(&RequestKind::Item, FilterSpec::default())
            .expect("item query should succeed");
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.category() != Some("ItemGroupRet")));
    }
}
