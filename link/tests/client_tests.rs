//! Typed client actions against a local endpoint.

mod common;

use common::{MockEndpoint, MockReply};
use fms_link::models::NO_PAGE_ACCESS;
use fms_link::{
    ApprovalDecision, Attachment, FmsLinkError, IndentForm, LiftingForm, StoreInForm, TallyForm,
    TallyStatus,
};
use serde_json::json;

#[tokio::test]
async fn test_login_processes_allowed_pages() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply(
        "login",
        MockReply::Script(json!({
            "success": true,
            "user": {
                "username": "asha",
                "name": "Asha Rao",
                "role": "stores",
                "allowedPages": [" store-in", "", "lifting ", 5]
            }
        })),
    );
    let client = endpoint.client();

    let user = client.login("asha", "pw").await.unwrap();
    assert_eq!(user.allowed_pages, vec!["store-in", "lifting"]);
    assert_eq!(user.role.as_deref(), Some("stores"));

    let request = &endpoint.requests_for("login")[0];
    assert_eq!(request.param("username"), Some("asha"));
    assert_eq!(request.param("password"), Some("pw"));
}

#[tokio::test]
async fn test_login_failure_messages() {
    let endpoint = MockEndpoint::start().await;
    let client = endpoint.client();

    endpoint.reply("login", MockReply::Script(json!({"success": false, "error": "Invalid credentials"})));
    assert_eq!(
        client.login("x", "y").await.unwrap_err().to_string(),
        "Invalid credentials"
    );

    endpoint.reply("login", MockReply::Script(json!({"success": false})));
    assert_eq!(client.login("x", "y").await.unwrap_err().to_string(), "Login failed");

    endpoint.reply("login", MockReply::Script(json!({"success": true})));
    assert_eq!(
        client.login("x", "y").await.unwrap_err().to_string(),
        "Invalid response from server"
    );

    endpoint.reply(
        "login",
        MockReply::Script(json!({"success": true, "user": {"username": "x", "name": "X", "allowedPages": []}})),
    );
    match client.login("x", "y").await {
        Err(FmsLinkError::AuthenticationError(msg)) => assert_eq!(msg, NO_PAGE_ACCESS),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_master_data_and_history_carry_cache_buster() {
    let endpoint = MockEndpoint::start().await;
    endpoint
        .reply(
            "getMasterData",
            MockReply::Script(json!({
                "success": true,
                "indentorNames": ["Ravi", "Meena"],
                "groupHeads": ["Mechanical"],
                "productNames": ["Bearing", "V-Belt"]
            })),
        )
        .reply("getFMSHistory", MockReply::Script(json!({"success": true})));
    let client = endpoint.client();

    let master = client.get_master_data().await.unwrap();
    assert_eq!(master.indentor_names, vec!["Ravi", "Meena"]);
    assert_eq!(master.product_names.len(), 2);

    assert!(client.get_fms_history().await.unwrap().is_empty());

    for action in ["getMasterData", "getFMSHistory"] {
        let request = &endpoint.requests_for(action)[0];
        assert!(request.param("_").is_some(), "{} without cache buster", action);
    }
}

#[tokio::test]
async fn test_submit_indent_returns_indent_number() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply(
        "submitFMS",
        MockReply::Script(json!({"success": true, "indentNo": "IN-0042"})),
    );
    let client = endpoint.client();

    let form = IndentForm {
        indentor_name: "Ravi".into(),
        area_of_machine: "Kiln".into(),
        group_head: "Mechanical".into(),
        product_name: "Bearing".into(),
        qty: 6,
        specifications: "6205".into(),
    };
    let receipt = client.submit_indent(&form).await.unwrap();
    assert_eq!(receipt.indent_no, "IN-0042");

    let request = &endpoint.requests_for("submitFMS")[0];
    assert_eq!(request.param("qty"), Some("6"));
    assert_eq!(request.param("areaOfMachine"), Some("Kiln"));
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let endpoint = MockEndpoint::start().await;
    let client = endpoint.client();

    let err = client
        .submit_tally_entry(
            3,
            &TallyForm {
                status: Some(TallyStatus::Yes),
                reason: " ".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FmsLinkError::ValidationError(_)));
    assert!(endpoint.requests().is_empty());
}

#[tokio::test]
async fn test_approval_action_params() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply("approvalAction", MockReply::Script(json!({"success": true})));
    let client = endpoint.client();

    client.approval_action(17, ApprovalDecision::Reject).await.unwrap();

    let request = &endpoint.requests_for("approvalAction")[0];
    assert_eq!(request.param("rowNumber"), Some("17"));
    assert_eq!(request.param("actionType"), Some("reject"));
}

#[tokio::test]
async fn test_remote_failure_surfaces_server_message() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply(
        "submitTallyEntry",
        MockReply::Script(json!({"success": false, "error": "X"})),
    );
    let client = endpoint.client();

    let err = client
        .submit_tally_entry(
            8,
            &TallyForm {
                status: Some(TallyStatus::No),
                reason: "Bill missing".into(),
            },
        )
        .await
        .unwrap_err();
    match err {
        FmsLinkError::RemoteError(msg) => assert_eq!(msg, "X"),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_lifting_upload_is_multipart() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply("submitLifting", MockReply::Raw("<html>Saved</html>".into()));
    let client = endpoint.client();

    let form = LiftingForm {
        bill_no: "B-77".into(),
        vendor_name: "Acme Traders".into(),
        lift_qty: 12.0,
        type_of_bill: "Independent".into(),
        bill_amount: 4200.5,
        photo_of_bill: Some(Attachment::new("bill.png", "image/png", vec![0u8; 128])),
    };
    client.submit_lifting(21, &form).await.unwrap();

    let requests = endpoint.requests_for("submitLifting");
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.param("rowNumber"), Some("21"));
    assert_eq!(request.param("billAmount"), Some("4200.5"));
    assert_eq!(request.param("photoFileName"), Some("bill.png"));
    let encoded = request.param("photoOfBillBase64").expect("base64 photo field");
    assert!(encoded.starts_with("data:image/png;base64,AAAA"), "got {}", encoded);

    let file = request.file.as_ref().expect("file part");
    assert_eq!(file.field, "photoOfBill");
    assert_eq!(file.file_name, "bill.png");
    assert_eq!(file.content_type, "image/png");
    assert_eq!(file.size, 128);
}

#[tokio::test]
async fn test_lifting_upload_without_photo() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply("submitLifting", MockReply::Bare(json!({"success": true})));
    let client = endpoint.client();

    let form = LiftingForm {
        bill_no: "B-78".into(),
        vendor_name: "Acme Traders".into(),
        lift_qty: 1.0,
        type_of_bill: "Dependent".into(),
        bill_amount: 99.0,
        photo_of_bill: None,
    };
    client.submit_lifting(22, &form).await.unwrap();

    let request = &endpoint.requests_for("submitLifting")[0];
    assert!(request.file.is_none());
    assert_eq!(request.param("photoFileName"), Some(""));
    assert_eq!(request.param("photoOfBillBase64"), Some(""));
}

#[tokio::test]
async fn test_store_in_upload_failure() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply(
        "submitStoreIn",
        MockReply::Bare(json!({"success": false, "error": "Row locked"})),
    );
    let client = endpoint.client();

    let form = StoreInForm {
        in_qty: 3.0,
        unit_of_measurement: "Nos".into(),
        photo_of_product: Some(Attachment::new("crate.jpg", "image/jpeg", vec![1, 2, 3])),
    };
    match client.submit_store_in(5, &form).await {
        Err(FmsLinkError::RemoteError(msg)) => assert_eq!(msg, "Row locked"),
        other => panic!("unexpected {:?}", other),
    }

    let request = &endpoint.requests_for("submitStoreIn")[0];
    assert_eq!(request.file.as_ref().map(|f| f.field.as_str()), Some("photoOfProduct"));
    assert_eq!(
        request.param("photoOfProductBase64"),
        Some("data:image/jpeg;base64,AQID")
    );
}

#[tokio::test]
async fn test_upload_rejected_with_status() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply("submitStoreIn", MockReply::Status(503));
    let client = endpoint.client();

    let form = StoreInForm {
        in_qty: 1.0,
        unit_of_measurement: "Kg".into(),
        photo_of_product: Some(Attachment::new("bag.jpg", "image/jpeg", vec![9])),
    };
    match client.submit_store_in(6, &form).await {
        Err(FmsLinkError::ServerError { status_code, .. }) => assert_eq!(status_code, 503),
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_payments_use_payments_field() {
    let endpoint = MockEndpoint::start().await;
    endpoint.reply(
        "getPendingPayments",
        MockReply::Script(json!({
            "success": true,
            "payments": [
                {"rowNumber": 30, "Indent No.": "IN-0030", "Amount": 1500, "Make Payment": "https://pay.example.com/30"}
            ]
        })),
    );
    let client = endpoint.client();

    let payments = client.get_pending_payments().await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].number("Amount"), Some(1500.0));
}
