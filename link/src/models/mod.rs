//! Data models for fms-link.
//!
//! Users and page ids, sheet rows, the response envelope, and the form
//! values each workflow action submits.

pub mod api_envelope;
pub mod approval_decision;
pub mod attachment;
pub mod indent_form;
pub mod indent_receipt;
pub mod lifting_form;
pub mod master_data;
pub mod page_id;
pub mod store_in_form;
pub mod tally_form;
pub mod user;
pub mod utils;
pub mod workflow_record;


pub use api_envelope::ApiEnvelope;
pub use approval_decision::ApprovalDecision;
pub use attachment::Attachment;
pub use indent_form::IndentForm;
pub use indent_receipt::IndentReceipt;
pub use lifting_form::{
    LiftingForm, PHOTO_OF_BILL_BASE64_FIELD, PHOTO_OF_BILL_FIELD, TYPE_OF_BILL_OPTIONS,
};
pub use master_data::MasterData;
pub use page_id::PageId;
pub use store_in_form::{StoreInForm, PHOTO_OF_PRODUCT_BASE64_FIELD, PHOTO_OF_PRODUCT_FIELD};
pub use tally_form::{TallyForm, TallyStatus};
pub use user::{User, NO_PAGE_ACCESS};
pub use utils::{js_number, value_to_text};
pub use workflow_record::WorkflowRecord;
