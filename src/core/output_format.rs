//! Wire formats for log records
//!
//! Renders a [`LogRecord`] as exactly one line (no trailing newline) in one
//! of the supported formats:
//! - Json: `{"timestamp": ..., "level": ..., "trace_id": ..., "message": ..., "length": ...}`
//! - Logfmt: the same five fields as `key="value"` pairs
//! - ApacheCommon / ApacheCombined: access log lines
//! - ApacheError: error log lines
//! - BsdSyslog: RFC 3164 style lines
//! - Syslog: RFC 5424 style lines
//!
//! Fields a record does not carry (HTTP status, client port, display pid)
//! are drawn from the caller's random source at render time.

use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use rand::Rng;
use serde::Serialize;
use std::convert::Infallible;
use std::fmt;
use std::io;
use std::str::FromStr;

pub const CLIENT_ADDRESS: &str = "127.0.0.1";
pub const REQUEST_LINE: &str = "GET /index.html HTTP/1.1";
pub const STATUS_CODES: [u16; 4] = [200, 404, 500, 302];
pub const REFERER: &str = "https://example.com/";
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; FakeBot/1.0)";

/// user.notice
pub const SYSLOG_PRI: &str = "<13>";
pub const SYSLOG_VERSION: u8 = 1;
pub const SYSLOG_HOSTNAME: &str = "localhost";
pub const SYSLOG_APP_NAME: &str = "fake-app";
pub const SYSLOG_MSG_ID: &str = "ID1";

/// Bounds of the synthetic `[pid N]` shown in Apache error lines
pub const ERROR_PID_RANGE: std::ops::RangeInclusive<u32> = 1000..=99999;
/// Bounds of the synthetic client port in Apache error lines
pub const CLIENT_PORT_RANGE: std::ops::RangeInclusive<u16> = 1000..=65535;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// JSON object, also the fallback for unrecognized names
    ///
    /// Example: `{"timestamp": "2023-10-11T14:32:52.123456Z", "level": "INFO", "trace_id": "00000001", "message": "ok", "length": 2}`
    #[default]
    Json,

    /// Example: `timestamp="2023-10-11T14:32:52.123456Z" level="INFO" trace_id="00000001" message="ok" length="2"`
    Logfmt,

    /// Example: `127.0.0.1 - - [11/Oct/2023:14:32:52 +0000] "GET /index.html HTTP/1.1" 200 2`
    ApacheCommon,

    /// Common format followed by quoted referer and user agent
    ApacheCombined,

    /// Example: `[Wed Oct 11 14:32:52.123456 2023] [core:info] [pid 4242] [client 127.0.0.1:50123] ok`
    ApacheError,

    /// Example: `<13>Oct 11 14:32:52 localhost fake-app: ok`
    BsdSyslog,

    /// Example: `<13>1 2023-10-11T14:32:52.123456Z localhost fake-app 1234 ID1 - ok`
    Syslog,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 7] = [
        OutputFormat::Json,
        OutputFormat::Logfmt,
        OutputFormat::ApacheCommon,
        OutputFormat::ApacheCombined,
        OutputFormat::ApacheError,
        OutputFormat::BsdSyslog,
        OutputFormat::Syslog,
    ];

    /// Match a format name case-insensitively.
    ///
    /// Spaces are part of the name: `"Apache common"` and `"apache_common"`
    /// are both accepted, `" json"` is not.
    pub fn recognize(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "logfmt" => Some(OutputFormat::Logfmt),
            "apache common" | "apache_common" => Some(OutputFormat::ApacheCommon),
            "apache combined" | "apache_combined" => Some(OutputFormat::ApacheCombined),
            "apache error" | "apache_error" => Some(OutputFormat::ApacheError),
            "bsd syslog" | "bsd_syslog" | "rfc3164" => Some(OutputFormat::BsdSyslog),
            "syslog" | "rfc5424" => Some(OutputFormat::Syslog),
            _ => None,
        }
    }

    /// Match a format name, falling back to [`OutputFormat::Json`]
    pub fn from_name(name: &str) -> Self {
        Self::recognize(name).unwrap_or_default()
    }

    /// Canonical identifier
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Logfmt => "logfmt",
            OutputFormat::ApacheCommon => "apache_common",
            OutputFormat::ApacheCombined => "apache_combined",
            OutputFormat::ApacheError => "apache_error",
            OutputFormat::BsdSyslog => "bsd_syslog",
            OutputFormat::Syslog => "syslog",
        }
    }

    /// Whether rendering draws from the random source
    pub fn uses_randomness(&self) -> bool {
        matches!(
            self,
            OutputFormat::ApacheCommon | OutputFormat::ApacheCombined | OutputFormat::ApacheError
        )
    }

    /// Render a record as a single line without trailing newline
    pub fn render<R: Rng + ?Sized>(&self, record: &LogRecord, rng: &mut R) -> String {
        match self {
            OutputFormat::Json => self.render_json(record),
            OutputFormat::Logfmt => self.render_logfmt(record),
            OutputFormat::ApacheCommon => self.render_apache_access(record, rng, false),
            OutputFormat::ApacheCombined => self.render_apache_access(record, rng, true),
            OutputFormat::ApacheError => self.render_apache_error(record, rng),
            OutputFormat::BsdSyslog => self.render_bsd_syslog(record),
            OutputFormat::Syslog => self.render_syslog(record),
        }
    }

    fn render_json(&self, record: &LogRecord) -> String {
        let mut buf = Vec::with_capacity(128 + record.message().len());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        record
            .serialize(&mut serializer)
            .expect("string and integer fields always serialize into a Vec");
        String::from_utf8(buf).expect("serde_json emits valid UTF-8")
    }

    fn render_logfmt(&self, record: &LogRecord) -> String {
        let length = record.length().to_string();
        let timestamp = record.timestamp_text();
        [
            ("timestamp", timestamp.as_str()),
            ("level", record.level().to_str()),
            ("trace_id", record.trace_id()),
            ("message", record.message()),
            ("length", length.as_str()),
        ]
        .iter()
        .map(|(key, value)| format!("{}={}", key, self.quote_logfmt_value(value)))
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Quote a logfmt value, escaping embedded double quotes only
    fn quote_logfmt_value(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\\\""))
    }

    fn render_apache_access<R: Rng + ?Sized>(
        &self,
        record: &LogRecord,
        rng: &mut R,
        combined: bool,
    ) -> String {
        let status = STATUS_CODES[rng.gen_range(0..STATUS_CODES.len())];
        let common = format!(
            "{} - - [{}] \"{}\" {} {}",
            CLIENT_ADDRESS,
            record.timestamp().format(TimestampFormat::ApacheAccess),
            REQUEST_LINE,
            status,
            record.length()
        );

        if combined {
            format!("{} \"{}\" \"{}\"", common, REFERER, USER_AGENT)
        } else {
            common
        }
    }

    fn render_apache_error<R: Rng + ?Sized>(&self, record: &LogRecord, rng: &mut R) -> String {
        let pid = rng.gen_range(ERROR_PID_RANGE);
        let port = rng.gen_range(CLIENT_PORT_RANGE);
        format!(
            "[{}] [core:{}] [pid {}] [client {}:{}] {}",
            record.timestamp().format(TimestampFormat::ApacheError),
            record.level().to_lowercase_str(),
            pid,
            CLIENT_ADDRESS,
            port,
            record.message()
        )
    }

    fn render_bsd_syslog(&self, record: &LogRecord) -> String {
        format!(
            "{}{} {} {}: {}",
            SYSLOG_PRI,
            record.timestamp().format(TimestampFormat::BsdSyslog),
            SYSLOG_HOSTNAME,
            SYSLOG_APP_NAME,
            record.message()
        )
    }

    fn render_syslog(&self, record: &LogRecord) -> String {
        format!(
            "{}{} {} {} {} {} {} - {}",
            SYSLOG_PRI,
            SYSLOG_VERSION,
            record.timestamp().format(TimestampFormat::Rfc5424),
            SYSLOG_HOSTNAME,
            SYSLOG_APP_NAME,
            std::process::id(),
            SYSLOG_MSG_ID,
            record.message()
        )
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

/// Render `record` in the format named `format`, falling back to JSON
pub fn render<R: Rng + ?Sized>(record: &LogRecord, format: &str, rng: &mut R) -> String {
    OutputFormat::from_name(format).render(record, rng)
}

/// JSON layout with `", "` between members and `": "` after keys
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, Timestamp, ZoneMode};
    use chrono::{Duration, FixedOffset, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_record() -> LogRecord {
        let instant = Utc.with_ymd_and_hms(2023, 10, 11, 14, 32, 52).single().unwrap()
            + Duration::microseconds(123456);
        LogRecord::new(
            Timestamp::from_utc(instant, ZoneMode::Utc),
            LogLevel::Error,
            "42-00000007",
            "disk full",
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(5)
    }

    #[test]
    fn test_json_format() {
        let result = OutputFormat::Json.render(&sample_record(), &mut rng());
        assert_eq!(
            result,
            r#"{"timestamp": "2023-10-11T14:32:52.123456Z", "level": "ERROR", "trace_id": "42-00000007", "message": "disk full", "length": 9}"#
        );

        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["length"], 9);
    }

    #[test]
    fn test_json_escapes_quotes() {
        let record = LogRecord::new(
            *sample_record().timestamp(),
            LogLevel::Info,
            "1",
            r#"say "hi" \ bye"#,
        );
        let result = OutputFormat::Json.render(&record, &mut rng());
        let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
        assert_eq!(parsed["message"], r#"say "hi" \ bye"#);
    }

    #[test]
    fn test_json_of_unusual_messages_is_a_full_object() {
        for message in ["", "h\u{e9}llo \u{1F600}", "bell\u{7}null\u{0}", "tab\there"] {
            let record = LogRecord::new(*sample_record().timestamp(), LogLevel::Debug, "3", message);
            let result = OutputFormat::Json.render(&record, &mut rng());
            assert!(result.starts_with('{') && result.ends_with('}'), "{}", result);
            let parsed: serde_json::Value = serde_json::from_str(&result).unwrap();
            assert_eq!(parsed["message"], record.message());
            assert_eq!(parsed["length"], record.length());
        }
    }

    #[test]
    fn test_logfmt_format() {
        let result = OutputFormat::Logfmt.render(&sample_record(), &mut rng());
        assert_eq!(
            result,
            r#"timestamp="2023-10-11T14:32:52.123456Z" level="ERROR" trace_id="42-00000007" message="disk full" length="9""#
        );
    }

    #[test]
    fn test_logfmt_escapes_double_quotes() {
        let record = LogRecord::new(
            *sample_record().timestamp(),
            LogLevel::Warn,
            "3",
            r#"user "bob" failed"#,
        );
        let result = OutputFormat::Logfmt.render(&record, &mut rng());
        assert!(result.contains(r#"message="user \"bob\" failed""#));
        assert!(result.ends_with(r#"length="17""#));
    }

    #[test]
    fn test_apache_common_format() {
        let mut expected_rng = rng();
        let status = STATUS_CODES[expected_rng.gen_range(0..STATUS_CODES.len())];

        let result = OutputFormat::ApacheCommon.render(&sample_record(), &mut rng());
        assert_eq!(
            result,
            format!(
                "127.0.0.1 - - [11/Oct/2023:14:32:52 +0000] \"GET /index.html HTTP/1.1\" {} 9",
                status
            )
        );
    }

    #[test]
    fn test_apache_combined_format() {
        let result = OutputFormat::ApacheCombined.render(&sample_record(), &mut rng());
        assert!(result.starts_with("127.0.0.1 - - [11/Oct/2023:14:32:52 +0000] \"GET /index.html HTTP/1.1\" "));
        assert!(result.ends_with(
            " 9 \"https://example.com/\" \"Mozilla/5.0 (compatible; FakeBot/1.0)\""
        ));
    }

    #[test]
    fn test_apache_status_codes_vary() {
        let mut rng = rng();
        let record = sample_record();
        let statuses: std::collections::HashSet<String> = (0..100)
            .map(|_| {
                let line = OutputFormat::ApacheCommon.render(&record, &mut rng);
                line.split(' ').nth(8).unwrap().to_string()
            })
            .collect();
        assert_eq!(statuses.len(), STATUS_CODES.len());
    }

    #[test]
    fn test_apache_error_format() {
        let mut expected_rng = rng();
        let pid = expected_rng.gen_range(ERROR_PID_RANGE);
        let port = expected_rng.gen_range(CLIENT_PORT_RANGE);

        let result = OutputFormat::ApacheError.render(&sample_record(), &mut rng());
        assert_eq!(
            result,
            format!(
                "[Wed Oct 11 14:32:52.123456 2023] [core:error] [pid {}] [client 127.0.0.1:{}] disk full",
                pid, port
            )
        );
    }

    #[test]
    fn test_bsd_syslog_format() {
        let result = OutputFormat::BsdSyslog.render(&sample_record(), &mut rng());
        assert_eq!(result, "<13>Oct 11 14:32:52 localhost fake-app: disk full");
    }

    #[test]
    fn test_syslog_format() {
        let result = OutputFormat::Syslog.render(&sample_record(), &mut rng());
        assert_eq!(
            result,
            format!(
                "<13>1 2023-10-11T14:32:52.123456Z localhost fake-app {} ID1 - disk full",
                std::process::id()
            )
        );
    }

    #[test]
    fn test_local_offset_in_structured_formats() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let instant = offset.with_ymd_and_hms(2023, 10, 11, 16, 32, 52).single().unwrap();
        let record = LogRecord::new(
            Timestamp::from_fixed(instant, ZoneMode::Local),
            LogLevel::Info,
            "1",
            "x",
        );

        let json = OutputFormat::Json.render(&record, &mut rng());
        assert!(json.contains(r#""timestamp": "2023-10-11T16:32:52.000000+02:00""#));

        let syslog = OutputFormat::Syslog.render(&record, &mut rng());
        assert!(syslog.starts_with("<13>1 2023-10-11T14:32:52.000000Z "));
    }

    #[test]
    fn test_deterministic_formats_ignore_rng() {
        let record = sample_record();
        for format in OutputFormat::ALL.iter().filter(|f| !f.uses_randomness()) {
            let a = format.render(&record, &mut StdRng::seed_from_u64(1));
            let b = format.render(&record, &mut StdRng::seed_from_u64(2));
            assert_eq!(a, b, "{} depends on randomness", format);
        }
    }

    #[test]
    fn test_recognize_names() {
        assert_eq!(OutputFormat::recognize("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::recognize("LogFmt"), Some(OutputFormat::Logfmt));
        assert_eq!(OutputFormat::recognize("Apache common"), Some(OutputFormat::ApacheCommon));
        assert_eq!(OutputFormat::recognize("apache_combined"), Some(OutputFormat::ApacheCombined));
        assert_eq!(OutputFormat::recognize("Apache Error"), Some(OutputFormat::ApacheError));
        assert_eq!(OutputFormat::recognize("BSD syslog"), Some(OutputFormat::BsdSyslog));
        assert_eq!(OutputFormat::recognize("RFC3164"), Some(OutputFormat::BsdSyslog));
        assert_eq!(OutputFormat::recognize("Syslog"), Some(OutputFormat::Syslog));
        assert_eq!(OutputFormat::recognize("rfc5424"), Some(OutputFormat::Syslog));
        assert_eq!(OutputFormat::recognize("apachecommon"), None);
        assert_eq!(OutputFormat::recognize(" json"), None);
    }

    #[test]
    fn test_unrecognized_falls_back_to_json() {
        let record = sample_record();
        let json = OutputFormat::Json.render(&record, &mut rng());
        for name in ["xml", "", "csv", "apache"] {
            assert_eq!(OutputFormat::from_name(name), OutputFormat::Json);
            assert_eq!(render(&record, name, &mut rng()), json);
        }
        assert_eq!("yaml".parse::<OutputFormat>(), Ok(OutputFormat::Json));
    }

    #[test]
    fn test_canonical_names_roundtrip() {
        for format in OutputFormat::ALL {
            assert_eq!(OutputFormat::recognize(format.name()), Some(format));
        }
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
