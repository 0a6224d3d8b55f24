use serde::{Deserialize, Serialize};

/// An absence, delay, or early-exit event from
/// `/students/{id}/absences/details`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbsenceEvent {
    #[serde(rename = "evtId")]
    pub evt_id: Option<i64>,
    /// "ABA0" absence, "ABR0" delay, "ABU0" early exit.
    #[serde(rename = "evtCode")]
    pub evt_code: Option<String>,
    #[serde(rename = "evtDate")]
    pub evt_date: Option<String>,
    #[serde(rename = "evtHPos")]
    pub evt_h_pos: Option<i32>,
    #[serde(rename = "evtValue")]
    pub evt_value: Option<i32>,
    #[serde(rename = "isJustified", default)]
    pub is_justified: bool,
    #[serde(rename = "justifReasonCode")]
    pub justif_reason_code: Option<String>,
    #[serde(rename = "justifReasonDesc")]
    pub justif_reason_desc: Option<String>,
}
