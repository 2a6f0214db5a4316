//! Error and status handling scenarios.

#[cfg(test)]
mod tests {
    use qbxml_core::{QueryError, RequestKind};
    use qbxml_model::{FilterSpec, OrderedStruct};
    use qbxml_xml::XmlError;

    use crate::{fixture, fixture_client};

    #[test]
    fn test_should_decode_error_severity_as_data() {
        let envelope = qbxml_xml::decode(&fixture("error_rs.xml")).expect("decode should succeed");

        assert_eq!(envelope.response_type, "CheckQueryRs");
        assert_eq!(envelope.status.severity.as_deref(), Some("Error"));
        assert_eq!(envelope.status.code.as_deref(), Some("3120"));
        let failure = envelope.business_error().expect("business error present");
        assert!(
            failure
                .message
                .as_deref()
                .is_some_and(|m| m.contains("\"80000004-1426787483\""))
        );
    }

    #[test]
    fn test_should_return_empty_records_for_rejected_query() {
        let client = fixture_client("error_rs.xml");
        let records = client
            .query(&RequestKind::Check, FilterSpec::default())
            .expect("query should succeed");
        assert!(records.is_empty());
    }

    #[test]
    fn test_should_fail_on_mismatched_response_section() {
        let client = fixture_client("check_query_rs.xml");
        let err = client
            .query(&RequestKind::PurchaseOrder, FilterSpec::default())
            .expect_err("query must fail");
        assert!(matches!(
            err,
            QueryError::MissingResponseSection { ref expected, ref found }
                if expected == "PurchaseOrderQueryRs" && found == "CheckQueryRs"
        ));
    }

    #[test]
    fn test_should_fail_on_unparsable_response() {
        let err = qbxml_xml::decode(b"<QBXML><QBXMLMsgsRs><CheckQueryRs>")
            .expect_err("decode must fail");
        assert!(matches!(err, XmlError::MalformedResponse(_)));
    }

    #[test]
    fn test_should_fail_on_unexpected_envelope() {
        let err = qbxml_xml::decode(b"<Envelope><Body/></Envelope>").expect_err("decode must fail");
        assert!(matches!(err, XmlError::UnexpectedSchema(_)));
    }

    #[test]
    fn test_should_reject_unknown_request_kind() {
        let err = "invoice".parse::<RequestKind>().expect_err("must fail");
        assert_eq!(err.to_string(), "no query adapter for request kind \"invoice\"");
    }

    #[test]
    fn test_should_reject_unencodable_body_before_sending() {
        let client = fixture_client("check_query_rs.xml");
        let body = OrderedStruct::new().with("Bad Name", "x");
        let err = client
            .call("CheckQueryRq", &body)
            .expect_err("call must fail");
        assert!(matches!(
            err,
            QueryError::Xml(XmlError::MalformedValue { .. })
        ));
        assert!(client.transport().requests().is_empty());
    }
}
