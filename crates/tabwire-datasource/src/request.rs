//! Parsing of the `tqx` request-options string.
//!
//! The options string is a semicolon-separated list of `key:value` pairs,
//! for example `out:csv;reqId:3`. Unknown keys are ignored for forward
//! compatibility; a pair without a colon is malformed.

use serde::{Deserialize, Serialize};

use crate::DataSourceError;

/// The output format a request asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Protocol-response envelope wrapping the structured table.
    #[default]
    Json,
    /// Complete HTML page.
    Html,
    /// Comma-separated text.
    Csv,
    /// Tab-separated text for spreadsheet import.
    TsvExcel,
}

impl OutputFormat {
    /// Parses a format token as it appears in the `out` option.
    pub fn parse(token: &str) -> Option<OutputFormat> {
        match token {
            "json" => Some(OutputFormat::Json),
            "html" => Some(OutputFormat::Html),
            "csv" => Some(OutputFormat::Csv),
            "tsv-excel" => Some(OutputFormat::TsvExcel),
            _ => None,
        }
    }

    /// The canonical token for the format.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Csv => "csv",
            OutputFormat::TsvExcel => "tsv-excel",
        }
    }
}

/// The parsed request options.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    /// Requested output format; defaults to [`OutputFormat::Json`].
    pub format: OutputFormat,
    /// Request id echoed back in the response envelope; defaults to `"0"`.
    pub request_id: String,
    /// Response handler name, when the request overrides the default.
    pub response_handler: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            format: OutputFormat::Json,
            request_id: "0".to_string(),
            response_handler: None,
        }
    }
}

impl RequestOptions {
    /// Parses a `tqx` options string. An empty string yields the defaults.
    ///
    /// Recognized keys are `out`, `version`, `reqId`, and `responseHandler`;
    /// anything else is ignored. A `version` other than the one this crate
    /// speaks is rejected.
    pub fn parse(tqx: &str) -> Result<RequestOptions, DataSourceError> {
        let mut options = RequestOptions::default();
        if tqx.is_empty() {
            return Ok(options);
        }
        for pair in tqx.split(';') {
            let Some((key, value)) = pair.split_once(':') else {
                return Err(DataSourceError::MalformedOptions(pair.to_string()));
            };
            match key {
                "out" => {
                    options.format = OutputFormat::parse(value)
                        .ok_or_else(|| DataSourceError::UnsupportedFormat(value.to_string()))?;
                }
                "version" => {
                    if value != tabwire::PROTOCOL_VERSION {
                        return Err(DataSourceError::UnsupportedVersion(value.to_string()));
                    }
                }
                "reqId" => options.request_id = value.to_string(),
                "responseHandler" => options.response_handler = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let options = RequestOptions::parse("").unwrap();
        assert_eq!(options, RequestOptions::default());
        assert_eq!(options.format, OutputFormat::Json);
        assert_eq!(options.request_id, "0");
    }

    #[test]
    fn all_recognized_keys_parse() {
        let options =
            RequestOptions::parse("out:csv;reqId:17;responseHandler:myApp.handle;version:0.6")
                .unwrap();
        assert_eq!(options.format, OutputFormat::Csv);
        assert_eq!(options.request_id, "17");
        assert_eq!(options.response_handler.as_deref(), Some("myApp.handle"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let options = RequestOptions::parse("out:html;sig:abc123").unwrap();
        assert_eq!(options.format, OutputFormat::Html);
    }

    #[test]
    fn pair_without_colon_is_malformed() {
        let err = RequestOptions::parse("out:json;oops").unwrap_err();
        assert!(matches!(err, DataSourceError::MalformedOptions(p) if p == "oops"));
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let err = RequestOptions::parse("out:pdf").unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedFormat(f) if f == "pdf"));
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = RequestOptions::parse("version:0.5").unwrap_err();
        assert!(matches!(err, DataSourceError::UnsupportedVersion(v) if v == "0.5"));
    }
}
