use serde::{Deserialize, Serialize};

/// A published notice from `/students/{id}/noticeboard`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeboardItem {
    #[serde(rename = "pubId")]
    pub pub_id: Option<i64>,
    #[serde(rename = "pubDT")]
    pub pub_dt: Option<String>,
    #[serde(rename = "evtCode")]
    pub evt_code: Option<String>,
    #[serde(rename = "readStatus", default)]
    pub read_status: bool,
    #[serde(rename = "cntTitle")]
    pub cnt_title: Option<String>,
    #[serde(rename = "cntCategory")]
    pub cnt_category: Option<String>,
    #[serde(rename = "cntValidFrom")]
    pub cnt_valid_from: Option<String>,
    #[serde(rename = "cntValidTo")]
    pub cnt_valid_to: Option<String>,
    #[serde(rename = "cntHasAttach", default)]
    pub cnt_has_attach: bool,
    #[serde(rename = "needReply", default)]
    pub need_reply: bool,
}
