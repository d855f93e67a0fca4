//! Graph API wire message shapes and intent rendering

use crate::db::Hospital;
use crate::state_machine::{OutboundIntent, AMBULANCE_NO_ID, AMBULANCE_YES_ID};
use serde::Serialize;

/// Wire-format cap on interactive list row titles
pub const LIST_ROW_TITLE_MAX: usize = 24;

const LIST_HEADER: &str = "Nearby Hospitals";
const LIST_BODY: &str = "Select a hospital to book a bed:";
const LIST_FOOTER: &str = "Tap \"View Hospitals\" to see options";
const LIST_BUTTON: &str = "View Hospitals";
const LIST_SECTION_TITLE: &str = "Available Hospitals";

/// One outbound message as the Graph API expects it
#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    messaging_product: &'static str,
    recipient_type: &'static str,
    to: String,
    #[serde(flatten)]
    payload: WirePayload,
}

impl WireMessage {
    pub fn new(to: impl Into<String>, payload: WirePayload) -> Self {
        Self {
            messaging_product: "whatsapp",
            recipient_type: "individual",
            to: to.into(),
            payload,
        }
    }
}

/// Message body variants
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WirePayload {
    Text { text: TextBody },
    Interactive { interactive: Interactive },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBody {
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interactive {
    List {
        header: TextHeader,
        body: TextBlock,
        footer: TextBlock,
        action: ListAction,
    },
    Button {
        body: TextBlock,
        action: ButtonAction,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct TextHeader {
    r#type: &'static str,
    text: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListAction {
    button: &'static str,
    sections: Vec<ListSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSection {
    title: &'static str,
    rows: Vec<ListRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRow {
    id: String,
    title: String,
    description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ButtonAction {
    buttons: Vec<ReplyButton>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButton {
    r#type: &'static str,
    reply: ReplyButtonBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyButtonBody {
    id: &'static str,
    title: &'static str,
}

impl WirePayload {
    pub fn text(body: impl Into<String>) -> Self {
        WirePayload::Text {
            text: TextBody { body: body.into() },
        }
    }

    /// Render an intent into its wire shape. Pure and deterministic.
    pub fn from_intent(intent: &OutboundIntent) -> Self {
        match intent {
            OutboundIntent::PlainText { body } => Self::text(body.clone()),
            OutboundIntent::HospitalMenu { hospitals } => WirePayload::Interactive {
                interactive: Interactive::List {
                    header: TextHeader {
                        r#type: "text",
                        text: LIST_HEADER,
                    },
                    body: TextBlock {
                        text: LIST_BODY.to_string(),
                    },
                    footer: TextBlock {
                        text: LIST_FOOTER.to_string(),
                    },
                    action: ListAction {
                        button: LIST_BUTTON,
                        sections: vec![ListSection {
                            title: LIST_SECTION_TITLE,
                            rows: hospitals.iter().map(hospital_row).collect(),
                        }],
                    },
                },
            },
            OutboundIntent::AmbulanceQuestion { hospital_name } => WirePayload::Interactive {
                interactive: Interactive::Button {
                    body: TextBlock {
                        text: format!("You selected {hospital_name}. Do you need an ambulance?"),
                    },
                    action: ButtonAction {
                        buttons: vec![
                            ReplyButton {
                                r#type: "reply",
                                reply: ReplyButtonBody {
                                    id: AMBULANCE_YES_ID,
                                    title: "Yes",
                                },
                            },
                            ReplyButton {
                                r#type: "reply",
                                reply: ReplyButtonBody {
                                    id: AMBULANCE_NO_ID,
                                    title: "No",
                                },
                            },
                        ],
                    },
                },
            },
        }
    }
}

/// Plain-text rendering of interactive intents for the degraded send path.
/// Plain text itself has no fallback.
pub fn fallback_text(intent: &OutboundIntent) -> Option<String> {
    match intent {
        OutboundIntent::PlainText { .. } => None,
        OutboundIntent::HospitalMenu { hospitals } => {
            let lines: Vec<String> = hospitals
                .iter()
                .map(|h| format!("- {} ({} beds)", h.name, h.available_beds))
                .collect();
            Some(format!("Available Hospitals:\n\n{}", lines.join("\n")))
        }
        OutboundIntent::AmbulanceQuestion { hospital_name } => Some(format!(
            "You selected {hospital_name}. Do you need an ambulance? Reply YES or NO."
        )),
    }
}

fn hospital_row(hospital: &Hospital) -> ListRow {
    ListRow {
        id: hospital.id.clone(),
        title: hospital.name.chars().take(LIST_ROW_TITLE_MAX).collect(),
        description: format!("{} beds available", hospital.available_beds),
    }
}
