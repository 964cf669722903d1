//! Export functions - serialize report records as JSON, delimited text or XML

use crate::error::{ReportError, Result};
use crate::report::types::Record;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xml => "xml",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xml => "application/xml",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "xml" => Ok(ExportFormat::Xml),
            other => Err(ReportError::UnknownExportFormat(other.to_string())),
        }
    }
}

/// Flat row for delimited text: nested values reduced to one column each
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatRow<'a> {
    order_id: &'a str,
    item_index: u32,
    seller: &'a str,
    purchase_date: &'a str,
    elapsed_days: Option<i64>,
    price: &'a str,
    quantity: u32,
    specs: &'a str,
    delivery_date: &'a str,
    eta_days: Option<i64>,
    ship_status: &'a str,
    tracking_no: &'a str,
    received: bool,
    thumbnail: &'a str,
}

impl<'a> From<&'a Record> for FlatRow<'a> {
    fn from(record: &'a Record) -> Self {
        FlatRow {
            order_id: &record.order_id,
            item_index: record.item_index,
            seller: &record.seller.name,
            purchase_date: &record.purchase_date,
            elapsed_days: record.elapsed_days,
            price: &record.price.text,
            quantity: record.quantity,
            specs: &record.specs,
            delivery_date: &record.delivery_date,
            eta_days: record.eta_days,
            ship_status: &record.ship_status,
            tracking_no: &record.tracking.number,
            received: record.received,
            thumbnail: &record.thumbnail,
        }
    }
}

/// Render records in the requested format
pub fn export(
    records: &[Record],
    format: ExportFormat,
    separator: u8,
    generated_at: DateTime<Utc>,
) -> Result<String> {
    info!("Exporting {} records as {}", records.len(), format.extension());

    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => to_delimited(records, separator),
        ExportFormat::Xml => to_xml(records, generated_at),
    }
}

pub fn to_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Header row of field names, then one row per record
pub fn to_delimited(records: &[Record], separator: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(separator)
        .has_headers(true)
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(FlatRow::from(record))?;
    }

    let bytes = writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn xml_error(e: impl std::fmt::Display) -> ReportError {
    ReportError::Xml(e.to_string())
}

/// `<orders>` document with one `<order>` per order id, items ordered by
/// (order id, item index)
pub fn to_xml(records: &[Record], generated_at: DateTime<Utc>) -> Result<String> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.order_id
            .cmp(&b.order_id)
            .then(a.item_index.cmp(&b.item_index))
    });

    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Start(BytesStart::new("orders")))
        .map_err(xml_error)?;

    let datetime = generated_at.to_rfc2822();
    let generator = BytesStart::new("generator").with_attributes([
        ("name", env!("CARGO_PKG_NAME")),
        ("version", env!("CARGO_PKG_VERSION")),
        ("datetime", datetime.as_str()),
    ]);
    writer
        .write_event(Event::Empty(generator))
        .map_err(xml_error)?;

    let mut last_order: Option<&str> = None;

    for record in sorted {
        if last_order != Some(record.order_id.as_str()) {
            if last_order.is_some() {
                close_order(&mut writer)?;
            }

            let order = BytesStart::new("order").with_attributes([
                ("id", record.order_id.as_str()),
                ("purchaseDate", record.purchase_date.as_str()),
                ("seller", record.seller.name.as_str()),
                ("sellerUrl", record.seller.url.as_str()),
            ]);
            writer.write_event(Event::Start(order)).map_err(xml_error)?;
            writer
                .write_event(Event::Start(BytesStart::new("items")))
                .map_err(xml_error)?;

            last_order = Some(record.order_id.as_str());
        }

        let attrs = item_attributes(record);
        let item = BytesStart::new("item")
            .with_attributes(attrs.iter().map(|(key, value)| (*key, value.as_str())));
        writer.write_event(Event::Empty(item)).map_err(xml_error)?;
    }

    if last_order.is_some() {
        close_order(&mut writer)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("orders")))
        .map_err(xml_error)?;

    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn close_order(writer: &mut Writer<Vec<u8>>) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new("items")))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new("order")))
        .map_err(xml_error)?;
    Ok(())
}

/// Item-level fields; order-level ones live on the `<order>` element
fn item_attributes(record: &Record) -> Vec<(&'static str, String)> {
    let optional = |value: Option<i64>| value.map(|v| v.to_string()).unwrap_or_default();

    vec![
        ("itemIndex", record.item_index.to_string()),
        ("elapsedDays", optional(record.elapsed_days)),
        ("price", record.price.text.clone()),
        ("currency", record.price.currency_code.clone()),
        ("quantity", record.quantity.to_string()),
        ("specs", record.specs.clone()),
        ("deliveryDate", record.delivery_date.clone()),
        ("etaDays", optional(record.eta_days)),
        ("shipStatus", record.ship_status.clone()),
        ("trackingNo", record.tracking.number.clone()),
        ("trackingUrl", record.tracking.url.clone()),
        ("received", record.received.to_string()),
        ("thumbnail", record.thumbnail.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::normalize::normalize_item;
    use crate::report::types::RawItem;
    use chrono::{NaiveDate, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    fn mock_record(order_id: &str, item_index: u32, specs: &str) -> Record {
        let item = RawItem {
            order_id: Some(order_id.to_string()),
            seller_name: Some("gadget-store".to_string()),
            seller_url: Some("https://shop.example/usr/gadget-store".to_string()),
            purchase_date: Some("Mar 10, 2024".to_string()),
            price: Some("US $12.00".to_string()),
            specs: Some(specs.to_string()),
            ..RawItem::default()
        };
        normalize_item(item, item_index, today())
    }

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("XML".parse::<ExportFormat>().unwrap(), ExportFormat::Xml);
        assert!("pdf".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&[mock_record("100", 1, "Cable")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["orderId"], "100");
        assert_eq!(value[0]["seller"]["name"], "gadget-store");
        assert_eq!(value[0]["price"]["currencyCode"], "US");
    }

    #[test]
    fn test_to_delimited_tab() {
        let records = vec![mock_record("100", 1, "Cable"), mock_record("100", 2, "Plug")];
        let text = to_delimited(&records, b'\t').unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("orderId\titemIndex\tseller\tpurchaseDate"));
        assert!(lines[1].starts_with("100\t1\tgadget-store\tMar 10, 2024\t10\tUS $12.00\t1\tCable"));
        assert!(lines[2].contains("\tPlug\t"));
    }

    #[test]
    fn test_to_delimited_empty() {
        assert_eq!(to_delimited(&[], b'\t').unwrap(), "");
    }

    #[test]
    fn test_to_xml_groups_orders() {
        let records = vec![
            mock_record("200", 1, "Lamp"),
            mock_record("100", 2, "Plug"),
            mock_record("100", 1, "Cable"),
        ];

        let xml = to_xml(&records, generated_at()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><orders><generator "#));
        assert!(xml.ends_with("</items></order></orders>"));
        assert_eq!(xml.matches("<order ").count(), 2);

        let first = xml.find(r#"<order id="100""#).unwrap();
        let second = xml.find(r#"<order id="200""#).unwrap();
        assert!(first < second);

        let cable = xml.find(r#"specs="Cable""#).unwrap();
        let plug = xml.find(r#"specs="Plug""#).unwrap();
        assert!(cable < plug);
    }

    #[test]
    fn test_to_xml_escapes_attributes() {
        let records = vec![mock_record("1", 1, r#"Cable "2m" <USB> & 'more'"#)];

        let xml = to_xml(&records, generated_at()).unwrap();

        assert!(xml.contains(r#"specs="Cable &quot;2m&quot; &lt;USB&gt; &amp; &apos;more&apos;""#));
    }

    #[test]
    fn test_to_xml_empty() {
        let xml = to_xml(&[], generated_at()).unwrap();

        assert!(!xml.contains("<order "));
        assert!(xml.ends_with("</orders>"));
    }
}
