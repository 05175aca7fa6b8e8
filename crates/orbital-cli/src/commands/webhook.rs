use orbital_api_models::{DeliveryTarget, PostbackFormat, WebhookConfig, WebhookRequest};

use crate::cli::{IdArgs, SendResultArgs, WebhookFields, WebhookUpdateArgs};
use crate::client::{AppContext, CliResult, service_result};
use crate::output::{print_json, render_webhook_list};
use crate::session::Session;

pub(crate) async fn handle_webhook_create(ctx: &AppContext, args: WebhookFields) -> CliResult<()> {
    let request = build_webhook(args, None)?;
    let session = Session::establish(ctx).await?;
    let created = service_result(session.api().webhook_create(&request).await)?;
    print_json(&created)
}

pub(crate) async fn handle_webhook_update(
    ctx: &AppContext,
    args: WebhookUpdateArgs,
) -> CliResult<()> {
    let WebhookUpdateArgs { id, fields } = args;
    let request = build_webhook(fields, Some(id.clone()))?;
    let session = Session::establish(ctx).await?;
    let updated = service_result(session.api().webhook_update(&id, &request).await)?;
    print_json(&updated)
}

pub(crate) async fn handle_webhook_get(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let IdArgs { id } = args;
    let session = Session::establish(ctx).await?;
    let webhook = service_result(session.api().webhook_get(&id).await)?;
    print_json(&webhook)
}

pub(crate) async fn handle_webhook_list(ctx: &AppContext) -> CliResult<()> {
    let session = Session::establish(ctx).await?;
    let webhooks = service_result(session.api().webhook_list().await)?;
    render_webhook_list(&webhooks)
}

pub(crate) async fn handle_webhook_sendresult(
    ctx: &AppContext,
    args: SendResultArgs,
) -> CliResult<()> {
    let SendResultArgs {
        webhook_id,
        result_id,
    } = args;
    let session = Session::establish(ctx).await?;
    service_result(
        session
            .api()
            .webhook_sendresult(&webhook_id, &result_id)
            .await,
    )?;
    println!("Result sent (webhook: {webhook_id}, result: {result_id})");
    Ok(())
}

/// Validate webhook flags with the same format rules as inline postbacks.
fn build_webhook(fields: WebhookFields, id: Option<String>) -> CliResult<WebhookRequest> {
    let format = PostbackFormat::parse(fields.format.as_deref().unwrap_or_default())?;
    let config = WebhookConfig {
        target: DeliveryTarget {
            url: fields.url.unwrap_or_default(),
            token: fields.token.unwrap_or_default(),
            fingerprint: fields.fingerprint.unwrap_or_default(),
            format,
            bucket: fields.bucket.unwrap_or_default(),
            region: fields.region.unwrap_or_default(),
            accesskey: fields.accesskey.unwrap_or_default(),
            secretkey: fields.secretkey.unwrap_or_default(),
        },
        label: fields.label.unwrap_or_default(),
    };
    config.validate()?;
    Ok(WebhookRequest {
        id,
        disabled: fields.disabled,
        config,
    })
}
