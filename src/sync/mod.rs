//! Backend synchronisation payloads
//!
//! Every page edit is applied to the in-memory model first and then returns
//! the requests the host must post to the document backend. The host owns
//! the transport. When a request fails the model is not rolled back; the
//! host shows the warning from [`report_sync_failure`] instead.

use serde::{Deserialize, Serialize};

use crate::models::clef::ClefShape;
use crate::models::elements::{BoundingBox, DivisionKind, HeadShape};
use crate::models::pitch::Pitch;

/// Pitches of one neume after an edit
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PitchInfo {
    pub id: Option<String>,
    pub note_info: Vec<Pitch>,
}

/// One backend call, tagged with its endpoint path
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "endpoint", content = "args", rename_all_fields = "camelCase")]
pub enum SyncRequest {
    #[serde(rename = "move/clef")]
    MoveClef {
        id: Option<String>,
        line: i32,
        zone: BoundingBox,
        pitch_info: Vec<PitchInfo>,
    },
    #[serde(rename = "update/clef/shape")]
    UpdateClefShape {
        id: Option<String>,
        shape: ClefShape,
        zone: BoundingBox,
        pitch_info: Vec<PitchInfo>,
    },
    #[serde(rename = "insert/clef")]
    InsertClef {
        shape: ClefShape,
        line: i32,
        zone: BoundingBox,
        before_id: Option<String>,
        pitch_info: Vec<PitchInfo>,
    },
    #[serde(rename = "delete/clef")]
    DeleteClef {
        ids: Vec<String>,
        pitch_info: Vec<PitchInfo>,
    },
    #[serde(rename = "insert/neume")]
    InsertNeume {
        typeid: Option<String>,
        pitches: Vec<Pitch>,
        head_shapes: Vec<HeadShape>,
        dot_form: Option<String>,
        zone: BoundingBox,
        before_id: Option<String>,
    },
    #[serde(rename = "move/neume")]
    MoveNeume {
        id: Option<String>,
        /// `None` when the neume only moved horizontally
        pitch_info: Option<Vec<Pitch>>,
        zone: BoundingBox,
        before_id: Option<String>,
    },
    #[serde(rename = "delete/neume")]
    DeleteNeume { ids: Vec<String> },
    #[serde(rename = "neumify")]
    Neumify {
        nids: Vec<String>,
        typeid: Option<String>,
        head_shapes: Vec<HeadShape>,
        zone: BoundingBox,
    },
    #[serde(rename = "ungroup")]
    Ungroup {
        nids: Vec<String>,
        bbs: Vec<Vec<BoundingBox>>,
    },
    #[serde(rename = "update/neume/headshape")]
    UpdateHeadShape {
        id: Option<String>,
        shape: HeadShape,
        zone: BoundingBox,
    },
    #[serde(rename = "insert/dot")]
    InsertDot {
        id: Option<String>,
        dot_form: String,
        zone: BoundingBox,
    },
    #[serde(rename = "delete/dot")]
    DeleteDot { id: Option<String>, zone: BoundingBox },
    #[serde(rename = "insert/division")]
    InsertDivision {
        kind: DivisionKind,
        zone: BoundingBox,
        before_id: Option<String>,
    },
    #[serde(rename = "move/division")]
    MoveDivision {
        id: Option<String>,
        zone: BoundingBox,
        before_id: Option<String>,
    },
    #[serde(rename = "delete/division")]
    DeleteDivision { ids: Vec<String> },
    #[serde(rename = "insert/custos")]
    InsertCustos {
        pitch: Pitch,
        zone: BoundingBox,
        before_id: Option<String>,
    },
    #[serde(rename = "move/custos")]
    MoveCustos {
        id: Option<String>,
        pitch: Pitch,
        zone: BoundingBox,
    },
    #[serde(rename = "delete/custos")]
    DeleteCustos { ids: Vec<String> },
}

impl SyncRequest {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SyncRequest::MoveClef { .. } => "move/clef",
            SyncRequest::UpdateClefShape { .. } => "update/clef/shape",
            SyncRequest::InsertClef { .. } => "insert/clef",
            SyncRequest::DeleteClef { .. } => "delete/clef",
            SyncRequest::InsertNeume { .. } => "insert/neume",
            SyncRequest::MoveNeume { .. } => "move/neume",
            SyncRequest::DeleteNeume { .. } => "delete/neume",
            SyncRequest::Neumify { .. } => "neumify",
            SyncRequest::Ungroup { .. } => "ungroup",
            SyncRequest::UpdateHeadShape { .. } => "update/neume/headshape",
            SyncRequest::InsertDot { .. } => "insert/dot",
            SyncRequest::DeleteDot { .. } => "delete/dot",
            SyncRequest::InsertDivision { .. } => "insert/division",
            SyncRequest::MoveDivision { .. } => "move/division",
            SyncRequest::DeleteDivision { .. } => "delete/division",
            SyncRequest::InsertCustos { .. } => "insert/custos",
            SyncRequest::MoveCustos { .. } => "move/custos",
            SyncRequest::DeleteCustos { .. } => "delete/custos",
        }
    }

    /// What the request does, phrased for the failure warning
    pub fn action(&self) -> &'static str {
        match self {
            SyncRequest::MoveClef { .. } => "move clef",
            SyncRequest::UpdateClefShape { .. } => "update clef shape",
            SyncRequest::InsertClef { .. } => "insert clef",
            SyncRequest::DeleteClef { .. } => "delete clef",
            SyncRequest::InsertNeume { .. } => "insert neume",
            SyncRequest::MoveNeume { .. } => "move neume",
            SyncRequest::DeleteNeume { .. } => "delete neume",
            SyncRequest::Neumify { .. } => "neumify selected neumes",
            SyncRequest::Ungroup { .. } => "ungroup selected neumes",
            SyncRequest::UpdateHeadShape { .. } => "change note head shape",
            SyncRequest::InsertDot { .. } => "add a dot to the punctum",
            SyncRequest::DeleteDot { .. } => "remove dot from the punctum",
            SyncRequest::InsertDivision { .. } => "insert division",
            SyncRequest::MoveDivision { .. } => "move division",
            SyncRequest::DeleteDivision { .. } => "delete division",
            SyncRequest::InsertCustos { .. } => "insert custos",
            SyncRequest::MoveCustos { .. } => "move custos",
            SyncRequest::DeleteCustos { .. } => "delete custos",
        }
    }
}

/// Log a failed backend call and return the warning shown to the user.
/// The in-memory model keeps the optimistic edit.
pub fn report_sync_failure(request: &SyncRequest, reason: &str) -> String {
    log::warn!("{} failed: {}", request.endpoint(), reason);
    format!(
        "Server failed to {}. Client and server are not synchronized.",
        request.action()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pitch::PitchName;

    #[test]
    fn test_request_json_carries_endpoint() {
        let request = SyncRequest::MoveCustos {
            id: Some("m-1".to_string()),
            pitch: Pitch::new(PitchName::G, 3),
            zone: BoundingBox::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["endpoint"], "move/custos");
        assert_eq!(json["args"]["id"], "m-1");
        assert_eq!(json["args"]["pitch"]["pname"], "g");
        assert_eq!(request.endpoint(), "move/custos");
    }

    #[test]
    fn test_fields_are_camel_case() {
        let request = SyncRequest::InsertDivision {
            kind: DivisionKind::Final,
            zone: BoundingBox::default(),
            before_id: Some("sb-2".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["args"]["beforeId"], "sb-2");
        assert_eq!(json["args"]["kind"], "final");
    }

    #[test]
    fn test_failure_message() {
        let request = SyncRequest::DeleteNeume { ids: vec!["n1".to_string()] };
        assert_eq!(
            report_sync_failure(&request, "500"),
            "Server failed to delete neume. Client and server are not synchronized."
        );
    }
}
