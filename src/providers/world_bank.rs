use crate::core::config::WorldBankProviderConfig;
use crate::core::indicator::join_codes;
use crate::core::{FetchError, FetchRequest, IndicatorSource, Observation};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct WorldBankProvider {
    base_url: String,
    source: u32,
    per_page: u32,
    timeout: Duration,
}

impl WorldBankProvider {
    pub fn new(config: &WorldBankProviderConfig) -> Self {
        WorldBankProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            source: config.source,
            per_page: config.per_page,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn request_url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/country/{}/indicator/{}?format=json&per_page={}&date={}:{}&source={}",
            self.base_url,
            request.countries.join(";"),
            join_codes(&request.indicators),
            self.per_page,
            request.years.start,
            request.years.end,
            self.source
        )
    }
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WorldBankObservation {
    country: NamedRef,
    indicator: NamedRef,
    date: String,
    value: Option<f64>,
}

impl TryFrom<WorldBankObservation> for Observation {
    type Error = FetchError;

    fn try_from(item: WorldBankObservation) -> Result<Self, Self::Error> {
        let year = item.date.trim().parse::<i32>().map_err(|_| {
            FetchError::Malformed(format!("Non-numeric year in observation: '{}'", item.date))
        })?;
        let country = item
            .country
            .value
            .ok_or_else(|| FetchError::Malformed("Observation without country name".into()))?;
        let indicator_id = item
            .indicator
            .id
            .ok_or_else(|| FetchError::Malformed("Observation without indicator id".into()))?;

        Ok(Observation {
            country,
            year,
            indicator_id,
            value: item.value,
        })
    }
}

/// Reads a pagination field that the API reports either as a number or a string.
fn page_field(meta: &Value, field: &str) -> Option<u64> {
    match meta.get(field)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Extracts observations from a `[metadata, observations]` body.
fn parse_body(body: &str) -> Result<Vec<Observation>, FetchError> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("Body is not JSON: {e}")))?;
    let Value::Array(mut parts) = document else {
        return Err(FetchError::Malformed(
            "Expected a top-level JSON array".to_string(),
        ));
    };
    if parts.is_empty() {
        return Err(FetchError::Malformed("Empty top-level array".to_string()));
    }

    // Errors come back as `[{"message": [{"id": .., "key": .., "value": ..}]}]`
    if let Some(messages) = parts[0].get("message").and_then(Value::as_array) {
        let text = messages
            .iter()
            .filter_map(|m| m.get("value").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(FetchError::Api(text));
    }

    // Only one page is ever requested, so anything beyond it would be silently lost.
    if let Some(pages) = page_field(&parts[0], "pages")
        && pages > 1
    {
        return Err(FetchError::Truncated {
            pages,
            total: page_field(&parts[0], "total"),
        });
    }

    let data = if parts.len() > 1 {
        parts.swap_remove(1)
    } else {
        Value::Null
    };
    if data.is_null() {
        warn!("API returned no data for the request");
        return Ok(Vec::new());
    }

    let items: Vec<WorldBankObservation> = serde_json::from_value(data)
        .map_err(|e| FetchError::Malformed(format!("Unexpected observation shape: {e}")))?;
    if items.is_empty() {
        warn!("API returned no data for the request");
    }
    items.into_iter().map(Observation::try_from).collect()
}

#[async_trait]
impl IndicatorSource for WorldBankProvider {
    #[instrument(
        name = "WorldBankFetch",
        skip(self, request),
        fields(countries = %request.countries.join(";"))
    )]
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Observation>, FetchError> {
        let url = self.request_url(request);
        debug!("Requesting indicators from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("macrodash/0.1")
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        let observations = parse_body(&text)?;
        debug!(count = observations.len(), "Received observations");
        Ok(observations)
    }
}
