use serde::{Deserialize, Serialize};

use crate::utils::digits;

/// Account role decoded from the one-letter code on the card record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserKind {
    #[default]
    Student,
    Parent,
    Teacher,
}

impl UserKind {
    /// Decode the platform's single-character role code.
    /// Unrecognized codes fall back to `Student`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "G" => UserKind::Parent,
            "D" => UserKind::Teacher,
            _ => UserKind::Student,
        }
    }
}

impl std::fmt::Display for UserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserKind::Student => write!(f, "Student"),
            UserKind::Parent => write!(f, "Parent"),
            UserKind::Teacher => write!(f, "Teacher"),
        }
    }
}

/// School descriptor, empty until a card fetch has succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    pub dedication: String,
    pub city: String,
    pub province: String,
    pub code: String,
}

/// The authenticated account, populated incrementally: login fills the name
/// and identifier fields, a later card fetch fills the school descriptor and
/// the role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub surname: String,
    /// Numeric account id, the digits of `ident`.
    pub id: String,
    /// Full alphanumeric account identifier as returned by login.
    pub ident: String,
    pub kind: UserKind,
    pub school: School,
}

impl Profile {
    /// Merge the card record: school descriptor fields plus the role code.
    pub fn apply_card(&mut self, card: &Card) {
        self.school = School {
            name: card.sch_name.clone().unwrap_or_default(),
            dedication: card.sch_dedication.clone().unwrap_or_default(),
            city: card.sch_city.clone().unwrap_or_default(),
            province: card.sch_prov.clone().unwrap_or_default(),
            code: card.sch_code.clone().unwrap_or_default(),
        };
        if let Some(ref code) = card.usr_type {
            self.kind = UserKind::from_code(code);
        }
    }

    pub(crate) fn set_identity(&mut self, first_name: &str, last_name: &str, ident: &str) {
        self.name = first_name.to_string();
        self.surname = last_name.to_string();
        self.ident = ident.to_string();
        self.id = digits(ident);
    }
}

/// Card record from `/students/{id}/card`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Card {
    pub ident: Option<String>,
    #[serde(rename = "usrType")]
    pub usr_type: Option<String>,
    #[serde(rename = "usrId")]
    pub usr_id: Option<i64>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    #[serde(rename = "birthDate")]
    pub birth_date: Option<String>,
    #[serde(rename = "fisCode")]
    pub fis_code: Option<String>,
    #[serde(rename = "schCode")]
    pub sch_code: Option<String>,
    #[serde(rename = "schName")]
    pub sch_name: Option<String>,
    #[serde(rename = "schDedication")]
    pub sch_dedication: Option<String>,
    #[serde(rename = "schCity")]
    pub sch_city: Option<String>,
    #[serde(rename = "schProv")]
    pub sch_prov: Option<String>,
}

/// Token status from `/auth/status/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenStatus {
    pub ident: Option<String>,
    pub expire: Option<String>,
    pub release: Option<String>,
    /// Seconds of validity remaining, as reported by the server.
    pub remains: Option<i64>,
    #[serde(rename = "showPwdChangeReminder")]
    pub show_pwd_change_reminder: Option<bool>,
}
