use orbital_api::ServiceFailure;
use orbital_api_models::{
    ContextMap, Postback, ProbeRequest, Query, QueryCreateRequest, StockInvocation, TargetOs,
};
use tracing::debug;

use crate::cli::{IdArgs, ProbeArgs, QueryCreateArgs, QueryTargetArgs};
use crate::client::{AppContext, CliError, CliResult, epoch_seconds, service_result};
use crate::output::print_json;
use crate::session::Session;

pub(crate) async fn handle_probe(ctx: &AppContext, args: ProbeArgs) -> CliResult<()> {
    let request = build_probe(args.target, epoch_seconds())?;
    let session = Session::establish(ctx).await?;
    let reply = service_result(session.api().probe(&request).await)?;
    print_json(&reply)
}

pub(crate) async fn handle_query_create(
    ctx: &AppContext,
    args: QueryCreateArgs,
) -> CliResult<()> {
    let request = build_query(args, epoch_seconds())?;
    let session = Session::establish(ctx).await?;
    let created = service_result(session.api().query_create(&request).await)?;
    println!("Query created (id: {})", created.id);
    Ok(())
}

pub(crate) async fn handle_query_disable(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let IdArgs { id } = args;
    let session = Session::establish(ctx).await?;
    let status = session.api().query_disable(&id).await?;
    if !status.is_success() {
        return Err(CliError::Service(ServiceFailure {
            status: status.as_u16(),
            message: format!("failed to disable query {id}"),
        }));
    }
    println!("Query disabled (id: {id})");
    Ok(())
}

/// Validate the shared target flags and build a probe body; `now` is epoch seconds.
pub(crate) fn build_probe(target: QueryTargetArgs, now: u64) -> CliResult<ProbeRequest> {
    if target.sql.is_empty() && target.stock.is_none() {
        return Err(CliError::validation(
            "provide at least one SQL statement or a --stock query",
        ));
    }
    let stock = target
        .stock
        .as_deref()
        .map(str::parse::<StockInvocation>)
        .transpose()?;
    let os_query = Query::batch(target.sql, target.names, target.labels)?;

    let request = ProbeRequest {
        expiry: absolute_expiry(target.expiry, now),
        nodes: target.nodes,
        os: target.os.into_iter().map(TargetOs::from).collect(),
        os_query,
        ..ProbeRequest::default()
    };
    Ok(match stock {
        Some(stock) => request.with_stock(stock),
        None => request,
    })
}

fn build_query(args: QueryCreateArgs, now: u64) -> CliResult<QueryCreateRequest> {
    let probe = build_probe(args.target, now)?;
    let mut postbacks = args
        .postbacks
        .iter()
        .map(|raw| raw.parse::<Postback>())
        .collect::<Result<Vec<_>, _>>()?;
    postbacks.extend(args.webhooks.into_iter().map(Postback::webhook));
    let context = args
        .context
        .as_deref()
        .map(str::parse::<ContextMap>)
        .transpose()?
        .unwrap_or_default();

    debug!(
        statements = probe.os_query.len(),
        postbacks = postbacks.len(),
        interval = args.interval,
        "scheduled query built"
    );
    Ok(QueryCreateRequest {
        probe,
        interval: args.interval,
        postbacks,
        context,
    })
}

pub(crate) const fn absolute_expiry(relative: u64, now: u64) -> u64 {
    now.saturating_add(relative)
}
