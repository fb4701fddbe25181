use actix_web::{http::StatusCode, test};
use chrono::{DateTime, Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;
use uuid::Uuid;

mod common;

#[actix_web::test]
#[serial]
async fn member_listing_requires_membership() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let outsider = common::seed_user(&ctx.db).await;

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&ctx.token_for(&manager)))
        .set_json(json!({"groupName": "Closed"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/group-user/{}", group["id"].as_str().unwrap()))
        .insert_header(common::auth_header(&ctx.token_for(&outsider)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"][0]["message"],
        "No permission for related group"
    );
}

#[actix_web::test]
#[serial]
async fn permission_flags_update_in_place() {
    // Arrange: Bob starts as a controlled member.
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let bob = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Crew"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id: Uuid = group["id"].as_str().unwrap().parse().unwrap();

    common::seed_member(&ctx.db, group_id, bob.id, true, false, true).await;

    // Act: promote Bob to admin and release the controlled flag.
    let req = test::TestRequest::put()
        .uri("/group-user")
        .insert_header(common::auth_header(&token))
        .set_json(json!({
            "groupId": group_id,
            "data": [{
                "userId": bob.id,
                "viewAccess": true,
                "adminAccess": true,
                "controlledUser": false
            }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Group users updated successfully"}));

    let req = test::TestRequest::get()
        .uri(&format!("/group-user/{}", group_id))
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let members: Value = test::read_body_json(resp).await;
    let bob_row = members
        .as_array()
        .unwrap()
        .iter()
        .find(|m| m["userId"] == bob.id.to_string())
        .unwrap();
    assert_eq!(bob_row["adminAccess"], true);
    assert_eq!(bob_row["controlledUser"], false);
}

#[actix_web::test]
#[serial]
async fn permission_updates_fail_for_unknown_members() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Sparse"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::put()
        .uri("/group-user")
        .insert_header(common::auth_header(&token))
        .set_json(json!({
            "groupId": group["id"],
            "data": [{
                "userId": Uuid::new_v4(),
                "viewAccess": true,
                "adminAccess": false,
                "controlledUser": true
            }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], "Group user not found");
}

#[actix_web::test]
#[serial]
async fn permission_updates_require_admin_access() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let bob = common::seed_user(&ctx.db).await;

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&ctx.token_for(&manager)))
        .set_json(json!({"groupName": "Locked"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id: Uuid = group["id"].as_str().unwrap().parse().unwrap();

    common::seed_member(&ctx.db, group_id, bob.id, true, false, true).await;

    // Bob tries to grant himself admin access.
    let req = test::TestRequest::put()
        .uri("/group-user")
        .insert_header(common::auth_header(&ctx.token_for(&bob)))
        .set_json(json!({
            "groupId": group_id,
            "data": [{
                "userId": bob.id,
                "viewAccess": true,
                "adminAccess": true,
                "controlledUser": false
            }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn removed_members_lose_their_access() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let bob = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Shrinking"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id: Uuid = group["id"].as_str().unwrap().parse().unwrap();

    common::seed_member(&ctx.db, group_id, bob.id, true, false, true).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/group-user/{}/{}", group_id, bob.id))
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"message": "Group user removed"}));

    // The membership is gone from the listing and Bob is locked out.
    let req = test::TestRequest::get()
        .uri(&format!("/group-user/{}", group_id))
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let members: Value = test::read_body_json(resp).await;
    assert_eq!(members.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/group-user/{}", group_id))
        .insert_header(common::auth_header(&ctx.token_for(&bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn removing_an_unknown_member_is_not_found() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Solo"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/group-user/{}/{}",
            group["id"].as_str().unwrap(),
            Uuid::new_v4()
        ))
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["message"], "Group user not found");
}

#[actix_web::test]
#[serial]
async fn invites_are_issued_with_a_week_of_validity() {
    // Arrange
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Welcoming"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    // Act: no body means the default expiry.
    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group["id"].as_str().unwrap()))
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invite: Value = test::read_body_json(resp).await;
    let code = invite["code"].as_str().unwrap();
    assert_eq!(code.len(), 32);
    assert_eq!(
        invite["inviteUrl"],
        format!("{}/join/{}", ctx.config.client_base_url, code)
    );

    let expires_at: DateTime<Utc> = invite["expiresAt"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(expires_at > Utc::now() + Duration::days(6));
    assert!(expires_at < Utc::now() + Duration::days(8));
}

#[actix_web::test]
#[serial]
async fn invite_expiry_is_bounded() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&token))
        .set_json(json!({"groupName": "Strict"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id = group["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&token))
        .set_json(json!({"expiresInDays": 0}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["details"][0]["message"],
        "expiresInDays must be between 1 and 365"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&token))
        .set_json(json!({"expiresInDays": 30}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let invite: Value = test::read_body_json(resp).await;
    let expires_at: DateTime<Utc> = invite["expiresAt"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(expires_at > Utc::now() + Duration::days(29));
}

#[actix_web::test]
#[serial]
async fn invites_require_admin_access() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let bob = common::seed_user(&ctx.db).await;

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&ctx.token_for(&manager)))
        .set_json(json!({"groupName": "Doorman"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id: Uuid = group["id"].as_str().unwrap().parse().unwrap();

    common::seed_member(&ctx.db, group_id, bob.id, true, false, true).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&ctx.token_for(&bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn a_redeemed_invite_creates_a_controlled_membership() {
    // Arrange
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let joiner = common::seed_user(&ctx.db).await;
    let manager_token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&manager_token))
        .set_json(json!({"groupName": "Open Door"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group["id"].as_str().unwrap()))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let invite: Value = test::read_body_json(resp).await;

    // Act
    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", invite["code"].as_str().unwrap()))
        .insert_header(common::auth_header(&ctx.token_for(&joiner)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Assert
    assert_eq!(resp.status(), StatusCode::CREATED);
    let membership: Value = test::read_body_json(resp).await;
    assert_eq!(membership["groupId"], group["id"]);
    assert_eq!(membership["userId"], joiner.id.to_string());
    assert_eq!(membership["viewAccess"], true);
    assert_eq!(membership["adminAccess"], false);
    assert_eq!(membership["controlledUser"], true);
    assert!(!membership["emailConfirmedAt"].is_null());

    // The group now shows up for the joiner.
    let req = test::TestRequest::get()
        .uri("/group")
        .insert_header(common::auth_header(&ctx.token_for(&joiner)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let groups: Value = test::read_body_json(resp).await;
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups.as_array().unwrap()[0]["id"], group["id"]);
}

#[actix_web::test]
#[serial]
async fn an_unknown_code_cannot_be_redeemed() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let user = common::seed_user(&ctx.db).await;

    let req = test::TestRequest::post()
        .uri("/group-user/code/definitely-not-issued")
        .insert_header(common::auth_header(&ctx.token_for(&user)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"][0]["message"],
        "Invalid or expired validation code"
    );
}

#[actix_web::test]
#[serial]
async fn a_code_is_spent_on_first_redemption() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let first = common::seed_user(&ctx.db).await;
    let second = common::seed_user(&ctx.db).await;
    let manager_token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&manager_token))
        .set_json(json!({"groupName": "Single File"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group["id"].as_str().unwrap()))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let invite: Value = test::read_body_json(resp).await;
    let code = invite["code"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", code))
        .insert_header(common::auth_header(&ctx.token_for(&first)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", code))
        .insert_header(common::auth_header(&ctx.token_for(&second)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["errors"][0]["message"],
        "Invalid or expired validation code"
    );
}

#[actix_web::test]
#[serial]
async fn redeeming_into_a_joined_group_reports_the_existing_membership() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let joiner = common::seed_user(&ctx.db).await;
    let manager_token = ctx.token_for(&manager);
    let joiner_token = ctx.token_for(&joiner);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&manager_token))
        .set_json(json!({"groupName": "Twice Welcome"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id = group["id"].as_str().unwrap().to_string();

    // Two separate codes for the same group.
    let mut codes = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/group-user/invite/{}", group_id))
            .insert_header(common::auth_header(&manager_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let invite: Value = test::read_body_json(resp).await;
        codes.push(invite["code"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", codes[0]))
        .insert_header(common::auth_header(&joiner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let first: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", codes[1]))
        .insert_header(common::auth_header(&joiner_token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let second: Value = test::read_body_json(resp).await;
    assert_eq!(second["id"], first["id"]);

    // Still exactly one membership for the joiner.
    let req = test::TestRequest::get()
        .uri(&format!("/group-user/{}", group_id))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let members: Value = test::read_body_json(resp).await;
    assert_eq!(members.as_array().unwrap().len(), 2);
}

#[actix_web::test]
#[serial]
async fn unverified_redeemers_join_without_email_confirmation() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let joiner = common::seed_unverified_user(&ctx.db).await;
    let manager_token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&manager_token))
        .set_json(json!({"groupName": "Pending"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group["id"].as_str().unwrap()))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let invite: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/code/{}", invite["code"].as_str().unwrap()))
        .insert_header(common::auth_header(&ctx.token_for(&joiner)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let membership: Value = test::read_body_json(resp).await;
    assert_eq!(membership["emailConfirmedAt"], Value::Null);
}

#[actix_web::test]
#[serial]
async fn invite_listing_is_admin_only() {
    common::setup_test_env();
    let Some(ctx) = common::TestContext::new().await else {
        return;
    };
    let app = test::init_service(ctx.app()).await;
    let manager = common::seed_user(&ctx.db).await;
    let bob = common::seed_user(&ctx.db).await;
    let manager_token = ctx.token_for(&manager);

    let req = test::TestRequest::post()
        .uri("/group")
        .insert_header(common::auth_header(&manager_token))
        .set_json(json!({"groupName": "Ledgered"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let group: Value = test::read_body_json(resp).await;
    let group_id: Uuid = group["id"].as_str().unwrap().parse().unwrap();

    common::seed_member(&ctx.db, group_id, bob.id, true, false, true).await;

    let req = test::TestRequest::post()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let invite: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&ctx.token_for(&bob)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri(&format!("/group-user/invite/{}", group_id))
        .insert_header(common::auth_header(&manager_token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let invites: Value = test::read_body_json(resp).await;
    let invites = invites.as_array().unwrap();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0]["code"], invite["code"]);
    assert_eq!(invites[0]["usedAt"], Value::Null);
}
