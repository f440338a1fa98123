//! Remote action names understood by the FMS script endpoint.
//!
//! Every request carries exactly one of these as its `action` parameter.

pub const LOGIN: &str = "login";
pub const GET_MASTER_DATA: &str = "getMasterData";
pub const GET_FMS_HISTORY: &str = "getFMSHistory";
pub const SUBMIT_FMS: &str = "submitFMS";
pub const GET_PENDING_APPROVALS: &str = "getPendingApprovals";
pub const APPROVAL_ACTION: &str = "approvalAction";
pub const GET_PENDING_LIFTING: &str = "getPendingLifting";
pub const SUBMIT_LIFTING: &str = "submitLifting";
pub const GET_PENDING_STORE_IN: &str = "getPendingStoreIn";
pub const SUBMIT_STORE_IN: &str = "submitStoreIn";
pub const GET_PENDING_TALLY_ENTRY: &str = "getPendingTallyEntry";
pub const SUBMIT_TALLY_ENTRY: &str = "submitTallyEntry";
pub const GET_PENDING_PAYMENTS: &str = "getPendingPayments";

/// Query parameter carrying the action name.
pub const ACTION_PARAM: &str = "action";

/// Query parameter carrying the generated callback name.
pub const CALLBACK_PARAM: &str = "callback";

/// Cache-busting parameter appended to history and master-data reads.
pub const CACHE_BUSTER_PARAM: &str = "_";
