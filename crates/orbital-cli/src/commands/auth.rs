use crate::client::{AppContext, CliResult, service_result};
use crate::output::print_json;
use crate::session::{Session, login};

/// Prints a fresh token so it can be exported as `ORBITAL_TOKEN`.
pub(crate) async fn handle_login(ctx: &AppContext) -> CliResult<()> {
    let token = login(ctx).await?;
    println!("{token}");
    Ok(())
}

pub(crate) async fn handle_ok(ctx: &AppContext) -> CliResult<()> {
    let session = Session::establish(ctx).await?;
    let info = service_result(session.api().ok().await)?;
    print_json(&info)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::client::CliError;
    use crate::client::test_support::{context_with, context_with_credentials};

    #[tokio::test]
    async fn login_prints_token_from_api_key() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/v0/oauth2/token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"token": "fresh"}));
        });

        let ctx = context_with_credentials(&server, Some("id:secret"), None);
        handle_login(&ctx).await.expect("login should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn ok_uses_session_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v0/ok")
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"organization": "acme", "user": "ops@acme"}));
        });

        handle_ok(&context_with(&server))
            .await
            .expect("ok should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn ok_surfaces_reported_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/v0/ok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"error": "token expired"}));
        });

        let err = handle_ok(&context_with(&server))
            .await
            .expect_err("reported error");
        assert!(matches!(err, CliError::Service(failure) if failure.message == "token expired"));
    }
}
