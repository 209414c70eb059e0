//! Response normalizer
//!
//! Parses XML response bodies into [`RemoteDocument`]s and separates service
//! error payloads from data. Each family reports faults its own way:
//!
//! - Bus Tracker: one or more `<error><msg>…</msg></error>` elements
//! - Train Tracker: a non-zero `<errCd>` with the message in `<errNm>`
//! - Customer Alerts: a non-zero `<ErrorCode>` with `<ErrorMessage>`

use std::fmt::Display;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::warn;

use crate::document::{Node, RemoteDocument, ServiceFault};
use crate::endpoints::Operation;
use crate::error::{CtaError, ParseError};

/// How a family signals a service-side fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultConvention {
    /// `<error>` elements under the root
    ErrorElements,
    /// `errCd` / `errNm` scalars
    RailErrorCode,
    /// `ErrorCode` / `ErrorMessage` scalars
    StatusErrorCode,
}

/// What a successful response to an operation looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedShape {
    /// Name of the document root element
    pub root: &'static str,
    /// How faults are reported
    pub faults: FaultConvention,
}

impl ExpectedShape {
    /// Shape of the responses to `operation`
    #[must_use]
    pub const fn for_operation(operation: Operation) -> Self {
        match operation {
            Operation::StatusRoutes => Self {
                root: "CTARoutes",
                faults: FaultConvention::StatusErrorCode,
            },
            Operation::StatusAlerts => Self {
                root: "CTAAlerts",
                faults: FaultConvention::StatusErrorCode,
            },
            Operation::TrainArrivals => Self {
                root: "ctatt",
                faults: FaultConvention::RailErrorCode,
            },
            _ => Self {
                root: "bustime-response",
                faults: FaultConvention::ErrorElements,
            },
        }
    }
}

/// Parse a body and classify it as data or a service fault
///
/// # Errors
///
/// `ParseFailure` if the body is not the expected XML document,
/// `ServiceError` if the service reported a fault and returned no data.
pub fn normalize(body: &str, shape: &ExpectedShape) -> Result<RemoteDocument, CtaError> {
    let document = parse(body, shape)?;
    classify(document, shape).map_err(CtaError::ServiceError)
}

/// Parse a body into a document rooted at the expected element
///
/// # Errors
///
/// Returns an error if the body is empty, not well-formed, truncated, or
/// rooted at a different element.
pub fn parse(body: &str, shape: &ExpectedShape) -> Result<RemoteDocument, ParseError> {
    let root = parse_tree(body)?;
    if root.name != shape.root {
        return Err(ParseError::UnexpectedRoot {
            expected: shape.root,
            found: root.name,
        });
    }
    Ok(RemoteDocument::new(root))
}

/// Separate a service fault from data
///
/// Bus responses may carry records and `<error>` elements side by side (for
/// example one unknown vehicle among several); those are returned as data
/// with the faults attached.
///
/// # Errors
///
/// Returns the service fault when the response carries no usable data.
pub fn classify(document: RemoteDocument, shape: &ExpectedShape) -> Result<RemoteDocument, ServiceFault> {
    match shape.faults {
        FaultConvention::ErrorElements => split_error_elements(document),
        FaultConvention::RailErrorCode => check_error_code(document, "errCd", "errNm"),
        FaultConvention::StatusErrorCode => check_error_code(document, "ErrorCode", "ErrorMessage"),
    }
}

fn split_error_elements(document: RemoteDocument) -> Result<RemoteDocument, ServiceFault> {
    let mut root = document.into_root();
    let (errors, data): (Vec<Node>, Vec<Node>) =
        root.children.into_iter().partition(|c| c.name == "error");
    root.children = data;

    let faults: Vec<ServiceFault> = errors
        .iter()
        .map(|e| {
            let message = e.field("msg").unwrap_or(e.text.as_str());
            let message = if message.is_empty() { "unspecified error" } else { message };
            ServiceFault::new(None, message)
        })
        .collect();

    let document = RemoteDocument::new(root);
    if faults.is_empty() {
        return Ok(document);
    }
    if document.is_empty() {
        let message = faults
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ServiceFault::new(None, message));
    }

    warn!(count = faults.len(), "Service reported errors alongside data");
    Ok(document.with_faults(faults))
}

fn check_error_code(
    document: RemoteDocument,
    code_field: &str,
    message_field: &str,
) -> Result<RemoteDocument, ServiceFault> {
    let code = document.field(code_field).map(str::trim).unwrap_or("0");
    if code.is_empty() || code == "0" {
        return Ok(document);
    }

    let message = document
        .field(message_field)
        .filter(|m| !m.is_empty())
        .unwrap_or("unspecified error");
    Err(ServiceFault::new(Some(code.to_string()), message))
}

/// Build the element tree of an XML body
///
/// Declarations, comments, processing instructions and doctypes are skipped.
///
/// # Errors
///
/// Returns an error for empty bodies, reader errors, text or elements
/// outside the single root element, and unclosed elements.
pub fn parse_tree(body: &str) -> Result<Node, ParseError> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Node> = Vec::new();
    let mut root: Option<Node> = None;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;
        match event {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed(&reader, "more than one root element"));
                }
                stack.push(element(&reader, &e)?);
            },
            Event::Empty(e) => {
                let node = element(&reader, &e)?;
                attach(&reader, node, &mut stack, &mut root)?;
            },
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| malformed(&reader, "closing tag without opening tag"))?;
                attach(&reader, node, &mut stack, &mut root)?;
            },
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| malformed(&reader, err))?;
                append_text(&reader, &mut stack, &text)?;
            },
            Event::CData(e) => {
                let text = std::str::from_utf8(e.as_ref()).map_err(|err| malformed(&reader, err))?;
                append_text(&reader, &mut stack, text)?;
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::Truncated { element: open.name });
    }
    root.ok_or(ParseError::Empty)
}

fn element(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> Result<Node, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| malformed(reader, e))?
        .to_string();
    let mut node = Node::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(reader, e))?
            .to_string();
        let value = attr.unescape_value().map_err(|e| malformed(reader, e))?;
        node.attributes.insert(key, value.into_owned());
    }
    Ok(node)
}

fn attach(
    reader: &Reader<&[u8]>,
    node: Node,
    stack: &mut [Node],
    root: &mut Option<Node>,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed(reader, "more than one root element"));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(reader: &Reader<&[u8]>, stack: &mut [Node], text: &str) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(text);
            Ok(())
        },
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed(reader, "text outside the root element")),
    }
}

fn malformed(reader: &Reader<&[u8]>, message: impl Display) -> ParseError {
    ParseError::Malformed {
        position: u64::try_from(reader.buffer_position()).unwrap_or(u64::MAX),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::ServiceFamily;

    const VEHICLES: &str = r#"<?xml version="1.0"?>
        <bustime-response>
            <vehicle>
                <vid>1462</vid>
                <tmstmp>20240115 12:00</tmstmp>
                <rt>3</rt>
                <des>King Drive</des>
            </vehicle>
            <vehicle>
                <vid>1463</vid>
                <rt>3</rt>
                <des>Harrison</des>
            </vehicle>
        </bustime-response>"#;

    fn bus() -> ExpectedShape {
        ExpectedShape::for_operation(Operation::Vehicles)
    }

    #[test]
    fn test_shapes() {
        assert_eq!(ExpectedShape::for_operation(Operation::StatusRoutes).root, "CTARoutes");
        assert_eq!(ExpectedShape::for_operation(Operation::StatusAlerts).root, "CTAAlerts");
        assert_eq!(
            ExpectedShape::for_operation(Operation::TrainArrivals).faults,
            FaultConvention::RailErrorCode
        );
        for operation in Operation::ALL {
            if operation.family() == ServiceFamily::Bus {
                assert_eq!(ExpectedShape::for_operation(operation).root, "bustime-response");
            }
        }
    }

    #[test]
    fn test_parse_records() {
        let doc = normalize(VEHICLES, &bus()).unwrap();
        assert_eq!(doc.record_count(), 2);
        let first = doc.records_named("vehicle").next().unwrap();
        assert_eq!(first.field("vid"), Some("1462"));
        assert_eq!(first.field("des"), Some("King Drive"));
        assert!(doc.faults().is_empty());
    }

    #[test]
    fn test_parse_attributes_entities_and_cdata() {
        let body = r#"<CTAAlerts><ErrorCode>0</ErrorCode><ErrorMessage/>
            <Alert id="42"><Headline>Red &amp; Purple</Headline>
            <FullDescription><![CDATA[<p>Shuttle buses</p>]]></FullDescription></Alert>
            </CTAAlerts>"#;
        let shape = ExpectedShape::for_operation(Operation::StatusAlerts);
        let doc = normalize(body, &shape).unwrap();
        let alert = doc.records_named("Alert").next().unwrap();
        assert_eq!(alert.attribute("id"), Some("42"));
        assert_eq!(alert.field("Headline"), Some("Red & Purple"));
        assert_eq!(alert.field("FullDescription"), Some("<p>Shuttle buses</p>"));
    }

    #[test]
    fn test_scalar_only_response() {
        let body = "<bustime-response><tm>20240115 12:00:00</tm></bustime-response>";
        let shape = ExpectedShape::for_operation(Operation::BusTime);
        let doc = normalize(body, &shape).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.field("tm"), Some("20240115 12:00:00"));
    }

    #[test]
    fn test_self_closing_root_is_empty_success() {
        let doc = normalize("<bustime-response/>", &bus()).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_bus_error_only_is_service_error() {
        let body = "<bustime-response><error><msg>No data found for parameter</msg></error></bustime-response>";
        let err = normalize(body, &bus()).unwrap_err();
        match err {
            CtaError::ServiceError(fault) => {
                assert_eq!(fault.message, "No data found for parameter");
                assert!(fault.code.is_none());
            },
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn test_bus_partial_error_keeps_data() {
        let body = "<bustime-response>\
            <vehicle><vid>1462</vid></vehicle>\
            <error><vid>9999</vid><msg>No data found for parameter</msg></error>\
            </bustime-response>";
        let doc = normalize(body, &bus()).unwrap();
        assert_eq!(doc.record_count(), 1);
        assert_eq!(doc.faults().len(), 1);
        assert_eq!(doc.faults()[0].message, "No data found for parameter");
        assert!(doc.records_named("error").next().is_none());
    }

    #[test]
    fn test_rail_error_code() {
        let shape = ExpectedShape::for_operation(Operation::TrainArrivals);
        let body = "<ctatt><tmst>20240115 12:00:00</tmst><errCd>101</errCd><errNm>Invalid API key</errNm></ctatt>";
        let err = normalize(body, &shape).unwrap_err();
        match err {
            CtaError::ServiceError(fault) => {
                assert_eq!(fault.code.as_deref(), Some("101"));
                assert_eq!(fault.message, "Invalid API key");
            },
            other => panic!("expected service error, got {other:?}"),
        }

        let ok = "<ctatt><tmst>20240115 12:00:00</tmst><errCd>0</errCd><errNm/></ctatt>";
        let doc = normalize(ok, &shape).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_status_error_code() {
        let shape = ExpectedShape::for_operation(Operation::StatusRoutes);
        let body = "<CTARoutes><ErrorCode>500</ErrorCode><ErrorMessage>Unknown route</ErrorMessage></CTARoutes>";
        let err = normalize(body, &shape).unwrap_err();
        assert!(matches!(err, CtaError::ServiceError(ref f) if f.message == "Unknown route"));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(parse("", &bus()), Err(ParseError::Empty));
        assert_eq!(parse("  \n ", &bus()), Err(ParseError::Empty));
        assert_eq!(parse("<?xml version=\"1.0\"?>", &bus()), Err(ParseError::Empty));
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let err = parse("<bustime-response><vehicle></bustime-response>", &bus()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[test]
    fn test_truncated_body() {
        let err = parse("<bustime-response><vehicle><vid>14", &bus()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Truncated { .. } | ParseError::Malformed { .. }
        ));
    }

    #[test]
    fn test_plain_text_is_malformed() {
        let err = parse("Service Unavailable", &bus()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[test]
    fn test_two_roots_are_malformed() {
        let err = parse("<bustime-response/><bustime-response/>", &bus()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }

    #[test]
    fn test_unexpected_root() {
        let err = parse("<html><body>Error</body></html>", &bus()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedRoot {
                expected: "bustime-response",
                found: "html".to_string()
            }
        );
    }

    #[test]
    fn test_parse_failure_is_distinct_from_empty_result() {
        let empty = normalize("<bustime-response></bustime-response>", &bus());
        assert!(empty.is_ok_and(|doc| doc.is_empty()));

        let broken = normalize("<bustime-response>", &bus());
        assert!(matches!(broken, Err(CtaError::ParseFailure(_))));
    }
}
