use serde::{Deserialize, Serialize};

/// A single mark from `/students/{id}/grades`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    #[serde(rename = "subjectId")]
    pub subject_id: Option<i64>,
    #[serde(rename = "subjectCode")]
    pub subject_code: Option<String>,
    #[serde(rename = "subjectDesc")]
    pub subject_desc: Option<String>,
    #[serde(rename = "evtId")]
    pub evt_id: Option<i64>,
    #[serde(rename = "evtCode")]
    pub evt_code: Option<String>,
    #[serde(rename = "evtDate")]
    pub evt_date: Option<String>,
    #[serde(rename = "decimalValue")]
    pub decimal_value: Option<f64>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
    pub color: Option<String>,
    #[serde(default)]
    pub canceled: bool,
    #[serde(default)]
    pub underlined: bool,
    #[serde(rename = "periodPos")]
    pub period_pos: Option<i32>,
    #[serde(rename = "periodDesc")]
    pub period_desc: Option<String>,
    #[serde(rename = "componentDesc")]
    pub component_desc: Option<String>,
    #[serde(rename = "weightFactor")]
    pub weight_factor: Option<f64>,
    #[serde(rename = "notesForFamily")]
    pub notes_for_family: Option<String>,
}

/// A grading period from `/students/{id}/periods`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "periodCode")]
    pub period_code: Option<String>,
    #[serde(rename = "periodPos")]
    pub period_pos: Option<i32>,
    #[serde(rename = "periodDesc")]
    pub period_desc: Option<String>,
    // "final" is a keyword on both sides of the wire
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(rename = "dateStart")]
    pub date_start: Option<String>,
    #[serde(rename = "dateEnd")]
    pub date_end: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: Option<i64>,
    pub description: Option<String>,
    pub order: Option<i32>,
    #[serde(default)]
    pub teachers: Vec<SubjectTeacher>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectTeacher {
    #[serde(rename = "teacherId")]
    pub teacher_id: Option<String>,
    #[serde(rename = "teacherName")]
    pub teacher_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_grade() {
        let json = r#"{
            "subjectId": 10,
            "subjectDesc": "MATEMATICA",
            "evtId": 101,
            "evtCode": "GRV0",
            "evtDate": "2024-03-12",
            "decimalValue": 7.5,
            "displayValue": "7½",
            "color": "green",
            "periodPos": 2,
            "periodDesc": "SECONDO QUADRIMESTRE",
            "componentDesc": "Orale",
            "weightFactor": 1.0
        }"#;
        let grade: Grade = serde_json::from_str(json).unwrap();
        assert_eq!(grade.subject_desc.as_deref(), Some("MATEMATICA"));
        assert_eq!(grade.decimal_value, Some(7.5));
        assert!(!grade.canceled);
    }

    #[test]
    fn test_parse_period_final_keyword() {
        let json = r#"{
            "periodCode": "Q2",
            "periodPos": 2,
            "periodDesc": "SECONDO QUADRIMESTRE",
            "final": true,
            "dateStart": "2024-01-29",
            "dateEnd": "2024-06-08"
        }"#;
        let period: Period = serde_json::from_str(json).unwrap();
        assert!(period.is_final);
        assert_eq!(period.period_code.as_deref(), Some("Q2"));
    }

    #[test]
    fn test_parse_subject_without_teachers() {
        let json = r#"{"id": 5, "description": "STORIA", "order": 3}"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert!(subject.teachers.is_empty());
    }
}
