//! Students, faculty and the locally cached user profile

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub roll_no: String,
    pub batch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
}

/// Link from a faculty record to a user account.
///
/// The store returns either the bare account id or the populated account
/// document; both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Id(String),
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl AccountRef {
    pub fn id(&self) -> &str {
        match self {
            AccountRef::Id(id) => id,
            AccountRef::Populated { id, .. } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<AccountRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
}

impl Faculty {
    /// True if this record is linked to the given account id
    pub fn is_linked_to(&self, account_id: &str) -> bool {
        self.user_id
            .as_ref()
            .map(|account| account.id() == account_id)
            .unwrap_or(false)
    }
}

/// The signed-in user as cached on the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_img: Option<String>,
}

/// Response of the profile image upload endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_ref_accepts_both_shapes() {
        let bare: Faculty =
            serde_json::from_str(r#"{"_id":"f1","name":"A","userId":"u1"}"#).unwrap();
        assert!(bare.is_linked_to("u1"));

        let populated: Faculty = serde_json::from_str(
            r#"{"_id":"f2","name":"B","userId":{"_id":"u2","name":"B","role":"faculty"}}"#,
        )
        .unwrap();
        assert!(populated.is_linked_to("u2"));
        assert!(!populated.is_linked_to("u1"));
    }

    #[test]
    fn test_unlinked_faculty() {
        let faculty: Faculty = serde_json::from_str(r#"{"name":"C"}"#).unwrap();
        assert!(!faculty.is_linked_to("u1"));
        assert!(faculty.id.is_empty());
    }

    #[test]
    fn test_upload_response_wire_format() {
        let resp: UploadResponse =
            serde_json::from_str(r#"{"filePath":"/uploads/u1-1.png"}"#).unwrap();
        assert_eq!(resp.file_path, "/uploads/u1-1.png");
    }
}
