use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Rendered in place of any absent value.
pub const PLACEHOLDER: &str = "-";

pub const HEALTH_ROUTE: &str = "/api/health";
pub const CODE_SEARCH_ROUTE: &str = "/api/legal-codes";
pub const SIDO_ROUTE: &str = "/api/legal-codes/sido";
pub const SIGUNGU_ROUTE: &str = "/api/legal-codes/sigungu";
pub const EUPMYEONDONG_ROUTE: &str = "/api/legal-codes/eupmyeondong";
pub const LAND_CHARACTERISTICS_ROUTE: &str = "/api/land-characteristics";

/// List envelope shared by every directory route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: usize,
}

impl<T> ItemsResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandCharacteristicsRequest {
    pub stdr_year: String,
    pub legal_dong_code: String,
    pub mountain: bool,
    pub main_no: String,
    pub sub_no: String,
}

/// The structured query as the service understood it, echoed back with the composed PNU.
/// Informational only, so every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EchoedQuery {
    pub pnu: String,
    pub stdr_year: String,
    pub legal_dong_code: String,
    pub main_no: String,
    pub sub_no: String,
    pub mountain: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandCharacteristicsResponse {
    #[serde(default, deserialize_with = "lenient_string")]
    pub result_code: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub result_msg: String,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<LandParcelRecord>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: usize,
    #[serde(
        default,
        deserialize_with = "lenient_echo",
        skip_serializing_if = "Option::is_none"
    )]
    pub request: Option<EchoedQuery>,
}

/// One land-characteristics row. Every field is optional; the wire keys follow the
/// land-characteristics data set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandParcelRecord {
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub pnu: Option<String>,
    #[serde(
        rename = "ldCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub legal_dong_name: Option<String>,
    #[serde(
        rename = "jibun",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub jibun: Option<String>,
    #[serde(
        rename = "mnnmSlno",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub main_sub_number: Option<String>,
    #[serde(
        rename = "stdrYear",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub stdr_year: Option<String>,
    #[serde(
        rename = "lndcgrCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub land_category: Option<String>,
    #[serde(
        rename = "lndpclAr",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub area: Option<String>,
    #[serde(
        rename = "lnduseSittnCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage_situation: Option<String>,
    #[serde(
        rename = "spfc1",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoning_primary: Option<String>,
    #[serde(
        rename = "spfc2",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub zoning_secondary: Option<String>,
    #[serde(
        rename = "roadSideCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub road_contact: Option<String>,
    #[serde(
        rename = "tpgrphFrmCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub terrain_shape: Option<String>,
    #[serde(
        rename = "tpgrphHgCodeNm",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub terrain_height: Option<String>,
    #[serde(
        rename = "prrnk",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub assessed_price: Option<String>,
    #[serde(
        rename = "lastUpdtDt",
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

impl LandParcelRecord {
    /// Lot number for display: the formatted jibun when present, else the raw main/sub number.
    pub fn parcel_number(&self) -> Option<&str> {
        self.jibun
            .as_deref()
            .or(self.main_sub_number.as_deref())
    }
}

/// Text form of a scalar JSON value. Blank strings, nulls, arrays and objects have none.
pub fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_text))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<LandParcelRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<LandParcelRecord>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Counts are advisory; anything that is not a non-negative integer reads as `0`.
fn lenient_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(json_text)
        .and_then(|text| text.parse::<usize>().ok())
        .unwrap_or_default())
}

fn lenient_echo<'de, D>(deserializer: D) -> Result<Option<EchoedQuery>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}
