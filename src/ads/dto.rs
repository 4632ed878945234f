use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ads::repo::Advertisement;

/// Advertisement payloads skip the field validator on purpose; the original
/// service read them straight out of the request body.
#[derive(Debug, Deserialize)]
pub struct CreateAdRequest {
    pub header: String,
    pub description: Option<String>,
    pub id_user: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateAdRequest {
    pub header: Option<String>,
    pub description: Option<String>,
    pub id_user: Option<i32>,
}

/// `?owner=` on PATCH; absent or non-numeric counts as a mismatch.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

/// `?owner=` on DELETE; required and numeric.
#[derive(Debug, Deserialize)]
pub struct DeleteOwnerQuery {
    pub owner: i32,
}

#[derive(Debug, Serialize)]
pub struct AdOut {
    #[serde(rename = "ID-объявления")]
    pub id: i32,
    #[serde(rename = "название")]
    pub header: String,
    #[serde(rename = "владелец")]
    pub id_user: i32,
    #[serde(rename = "описание")]
    pub description: Option<String>,
    #[serde(rename = "создано", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Advertisement> for AdOut {
    fn from(ad: Advertisement) -> Self {
        Self {
            id: ad.id,
            header: ad.header,
            id_user: ad.id_user,
            description: ad.description,
            created_at: ad.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_out_uses_original_labels() {
        let out = AdOut {
            id: 7,
            header: "Продам гараж".into(),
            id_user: 1,
            description: Some("недорого".into()),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["ID-объявления"], 7);
        assert_eq!(json["название"], "Продам гараж");
        assert_eq!(json["владелец"], 1);
        assert_eq!(json["описание"], "недорого");
        assert!(json["создано"].as_str().unwrap().starts_with("1970"));
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result: Result<UpdateAdRequest, _> =
            serde_json::from_value(serde_json::json!({ "email": "a@b.com" }));
        assert!(result.is_err());
    }

    #[test]
    fn update_accepts_partial_body() {
        let req: UpdateAdRequest =
            serde_json::from_value(serde_json::json!({ "header": "новое" })).unwrap();
        assert_eq!(req.header.as_deref(), Some("новое"));
        assert!(req.description.is_none() && req.id_user.is_none());
    }
}
