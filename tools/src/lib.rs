//! Inspection, decoding and fixture tools for evdb event buffers.
//!
//! This crate provides utilities for looking inside event buffers:
//!
//! - Walk the element structure of a buffer and summarize each event
//! - Decode events through a configured cursor into JSON
//! - Build event buffers from a JSON description
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the cursor is doing.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::{anyhow, bail, Context, Result};
use cursor::{
    timestamp, Cursor, CursorConfig, EventWriter, ObjectList, PropertyValue, Value,
};
use minipack::{ElementKind, ElementReader, Format};
use serde::{Deserialize, Serialize};
use tracing::debug;

//--------------------------------------
// Inspect
//--------------------------------------

/// Structural summary of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub offset: usize,
    pub byte_len: usize,
    pub ts: i64,
    pub seconds: u32,
    /// Number of property entries; 0 for a nil data map.
    pub properties: u32,
}

/// Structural summary of an event buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub byte_len: usize,
    /// Size of the leading state blob payload, if present.
    pub state_len: Option<usize>,
    pub events: Vec<EventSummary>,
    /// Description of the first structural problem, if any.
    pub fault: Option<String>,
    /// Bytes left unread after the walk stopped.
    pub trailing: usize,
}

/// Walks the element structure of an event buffer without a cursor config.
pub fn inspect_events(buf: &[u8]) -> InspectReport {
    let mut reader = ElementReader::new(buf);
    let mut state_len = None;
    if matches!(reader.peek_format().map(Format::kind), Some(ElementKind::Raw)) {
        match reader.read_raw() {
            Ok(state) => state_len = Some(state.len()),
            Err(err) => {
                return InspectReport {
                    byte_len: buf.len(),
                    state_len: None,
                    events: Vec::new(),
                    fault: Some(format!("state blob: {err}")),
                    trailing: buf.len(),
                }
            }
        }
    }

    let mut events = Vec::new();
    let mut fault = None;
    while !reader.is_empty() {
        let offset = reader.position();
        match inspect_event(&mut reader) {
            Ok((ts, properties)) => events.push(EventSummary {
                offset,
                byte_len: reader.position() - offset,
                ts,
                seconds: timestamp::to_seconds(ts),
                properties,
            }),
            Err(err) => {
                debug!(offset, error = %err, "inspect stopped");
                fault = Some(format!("event at offset {offset}: {err}"));
                break;
            }
        }
    }

    InspectReport {
        byte_len: buf.len(),
        state_len,
        events,
        fault,
        trailing: reader.remaining(),
    }
}

fn inspect_event(reader: &mut ElementReader<'_>) -> Result<(i64, u32)> {
    // The flag byte is the header of a two-element array.
    let flag = reader.peek_format();
    if flag != Some(Format::FixArray(2)) {
        bail!("bad event flag {flag:?}");
    }
    reader.read_array()?;
    let ts = reader.read_int().context("timestamp")?;
    let properties = match reader.read_map() {
        Ok(count) => count,
        Err(_) => {
            reader.read_nil().context("data map")?;
            0
        }
    };
    for _ in 0..properties {
        reader.read_int().context("property key")?;
        reader.skip_elem().context("property value")?;
    }
    Ok((ts, properties))
}

/// One element of a packed buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementEntry {
    pub offset: usize,
    /// Container nesting depth; top-level elements are 0.
    pub depth: usize,
    pub format: String,
    pub header_size: usize,
    /// Size including payload and container members, if the element is
    /// complete.
    pub total_size: Option<usize>,
}

/// Flat, depth-annotated listing of every element in a buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementListing {
    pub elements: Vec<ElementEntry>,
    pub fault: Option<String>,
}

/// Lists every element of `buf`, descending into array and map members.
pub fn list_elements(buf: &[u8]) -> ElementListing {
    let mut reader = ElementReader::new(buf);
    let mut elements = Vec::new();
    // (members still expected, entry index) for each open container.
    let mut open: Vec<(u64, usize)> = Vec::new();
    let mut fault = None;

    while !reader.is_empty() {
        let offset = reader.position();
        let Some(format) = reader.peek_format() else {
            fault = Some(format!("reserved tag at offset {offset}"));
            break;
        };
        let members = match format.kind() {
            ElementKind::Array => reader.read_array().map(u64::from),
            ElementKind::Map => reader.read_map().map(|count| 2 * u64::from(count)),
            _ => reader.skip_elem().map(|_| 0),
        };
        let members = match members {
            Ok(members) => members,
            Err(err) => {
                fault = Some(format!("element at offset {offset}: {err}"));
                break;
            }
        };
        elements.push(ElementEntry {
            offset,
            depth: open.len(),
            format: format.to_string(),
            header_size: format.header_size(),
            total_size: None,
        });

        if let Some((parent, _)) = open.last_mut() {
            *parent -= 1;
        }
        if members > 0 {
            open.push((members, elements.len() - 1));
            continue;
        }
        let end = reader.position();
        if let Some(entry) = elements.last_mut() {
            entry.total_size = Some(end - offset);
        }
        // Close every container whose last member just ended.
        while let Some(&(0, index)) = open.last() {
            open.pop();
            let entry = &mut elements[index];
            entry.total_size = Some(end - entry.offset);
        }
    }
    if fault.is_none() && !open.is_empty() {
        fault = Some(format!("{} unterminated containers", open.len()));
    }

    ElementListing { elements, fault }
}

/// Renders an element listing as an indented tree.
pub fn format_elements_pretty(listing: &ElementListing) -> String {
    let mut out = String::new();
    for entry in &listing.elements {
        let total = entry
            .total_size
            .map_or_else(|| "?".to_string(), |size| size.to_string());
        let _ = writeln!(
            out,
            "{:08x}  {:indent$}{} (header {}, total {})",
            entry.offset,
            "",
            entry.format,
            entry.header_size,
            total,
            indent = entry.depth * 2
        );
    }
    if let Some(fault) = &listing.fault {
        let _ = writeln!(out, "fault: {fault}");
    }
    out
}

/// Renders an inspect report as text.
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "buffer: {} bytes", report.byte_len);
    if let Some(state_len) = report.state_len {
        let _ = writeln!(out, "state blob: {state_len} bytes");
    }
    let _ = writeln!(out, "events: {}", report.events.len());
    for event in &report.events {
        let _ = writeln!(
            out,
            "  @{:<6} {:>4} bytes  t={}s ts=0x{:x}  {} properties",
            event.offset, event.byte_len, event.seconds, event.ts, event.properties
        );
    }
    if let Some(fault) = &report.fault {
        let _ = writeln!(out, "fault: {fault}");
    }
    if report.trailing > 0 {
        let _ = writeln!(out, "trailing: {} bytes", report.trailing);
    }
    out
}

//--------------------------------------
// Decode
//--------------------------------------

/// One event decoded through a cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedEvent {
    pub session: u32,
    pub index: i32,
    pub timestamp: u32,
    pub ts: i64,
    /// Declared property values keyed by id.
    pub properties: BTreeMap<i64, serde_json::Value>,
}

/// Decode output of one buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeOutput {
    pub events: Vec<DecodedEvent>,
    pub sessions: u32,
    pub fault: Option<String>,
}

/// Loads and validates a cursor config from JSON.
pub fn load_config(json: &str) -> Result<CursorConfig> {
    let config: CursorConfig = serde_json::from_str(json).context("parse config json")?;
    config
        .validate()
        .map_err(|err| anyhow!("config validation failed: {err}"))?;
    Ok(config)
}

/// Decodes every event of `buf` through a cursor built from `config`.
///
/// `idle` overrides the config's session idle threshold.
pub fn decode_events(
    buf: &[u8],
    config: &CursorConfig,
    idle: Option<u32>,
) -> Result<DecodeOutput> {
    let mut outputs = decode_objects(&[buf], config, idle)?;
    outputs.pop().ok_or_else(|| anyhow!("no object decoded"))
}

/// Decodes several objects in turn, one output per object.
///
/// The cursor walks the objects through an [`ObjectList`] and re-arms the
/// idle threshold after every bind.
pub fn decode_objects(
    objects: &[&[u8]],
    config: &CursorConfig,
    idle: Option<u32>,
) -> Result<Vec<DecodeOutput>> {
    let mut cursor = Cursor::from_config(config).context("build cursor")?;
    cursor.set_object_source(objects.iter().copied().collect::<ObjectList<'_>>());
    let idle = idle.unwrap_or(config.session_idle_secs);
    let ids: Vec<i64> = config.properties.iter().map(|p| p.id).collect();

    let mut outputs = Vec::with_capacity(objects.len());
    while cursor.next_object() {
        cursor.set_session_idle(idle);
        outputs.push(walk_object(&mut cursor, &ids));
    }
    Ok(outputs)
}

fn walk_object(cursor: &mut Cursor<'_>, ids: &[i64]) -> DecodeOutput {
    let mut events = Vec::new();
    let mut sessions = 0;
    while cursor.next_session_checked() {
        let mut started = false;
        while cursor.next_event_checked() {
            if !started {
                started = true;
                sessions += 1;
            }
            events.push(DecodedEvent {
                session: sessions,
                index: cursor.session_event_index(),
                timestamp: cursor.timestamp(),
                ts: cursor.ts(),
                properties: ids
                    .iter()
                    .filter_map(|&id| cursor.value(id).map(|value| (id, value_json(value))))
                    .collect(),
            });
        }
    }

    DecodeOutput {
        events,
        sessions,
        fault: cursor.fault().map(|fault| fault.to_string()),
    }
}

fn value_json(value: Value<'_>) -> serde_json::Value {
    match value {
        Value::String(bytes) => String::from_utf8_lossy(bytes).into_owned().into(),
        Value::Integer(v) => v.into(),
        Value::Float(v) => v.into(),
        Value::Boolean(v) => v.into(),
    }
}

/// Renders decode output as text, one line per event.
pub fn format_decode_pretty(output: &DecodeOutput) -> String {
    let mut out = String::new();
    let mut session = 0;
    for event in &output.events {
        if event.session != session {
            session = event.session;
            let _ = writeln!(out, "session {session}:");
        }
        let _ = write!(out, "  [{}] t={}s", event.index, event.timestamp);
        for (id, value) in &event.properties {
            let _ = write!(out, " {id}={value}");
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "{} events in {} sessions",
        output.events.len(),
        output.sessions
    );
    if let Some(fault) = &output.fault {
        let _ = writeln!(out, "fault: {fault}");
    }
    out
}

//--------------------------------------
// Encode
//--------------------------------------

/// JSON description of an event buffer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodeInput {
    /// Leading state blob.
    #[serde(default)]
    pub state: Option<String>,
    pub events: Vec<EncodeEvent>,
}

/// One event; `ts` wins over `seconds` when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EncodeEvent {
    #[serde(default)]
    pub seconds: Option<u32>,
    #[serde(default)]
    pub ts: Option<i64>,
    /// Property values keyed by decimal id. `None` writes a nil data map.
    #[serde(default)]
    pub properties: Option<BTreeMap<String, serde_json::Value>>,
}

/// Builds an event buffer from its JSON description.
pub fn encode_events(input: &EncodeInput) -> Result<Vec<u8>> {
    let mut writer = match &input.state {
        Some(state) => EventWriter::with_state(state.as_bytes()).context("state blob")?,
        None => EventWriter::new(),
    };
    for (n, event) in input.events.iter().enumerate() {
        let ts = event
            .ts
            .unwrap_or_else(|| timestamp::from_seconds(event.seconds.unwrap_or(0)));
        let Some(properties) = &event.properties else {
            writer.empty_event(ts);
            continue;
        };
        let properties = properties
            .iter()
            .map(|(id, value)| {
                let id: i64 = id
                    .parse()
                    .with_context(|| format!("event {n}: property id {id:?}"))?;
                let value = property_value(value)
                    .with_context(|| format!("event {n}: property {id}"))?;
                Ok((id, value))
            })
            .collect::<Result<Vec<_>>>()?;
        writer
            .event(ts, &properties)
            .with_context(|| format!("event {n}"))?;
    }
    Ok(writer.finish())
}

fn property_value(value: &serde_json::Value) -> Result<PropertyValue<'_>> {
    use serde_json::Value as Json;
    Ok(match value {
        Json::Null => PropertyValue::Nil,
        Json::Bool(v) => PropertyValue::Boolean(*v),
        Json::String(s) => PropertyValue::String(s),
        Json::Number(n) => match n.as_i64() {
            Some(v) => PropertyValue::Integer(v),
            None => PropertyValue::Float(
                n.as_f64()
                    .ok_or_else(|| anyhow!("number {n} out of range"))?,
            ),
        },
        Json::Array(_) | Json::Object(_) => bail!("unsupported value {value}"),
    })
}
