use crate::cli::IdArgs;
use crate::client::{AppContext, CliResult, service_result};
use crate::output::{print_json, render_feature_list};
use crate::session::Session;

pub(crate) async fn handle_features_get(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let IdArgs { id } = args;
    let session = Session::establish(ctx).await?;
    let feature = service_result(session.api().features_get(&id).await)?;
    print_json(&feature)
}

pub(crate) async fn handle_features_list(ctx: &AppContext) -> CliResult<()> {
    let session = Session::establish(ctx).await?;
    let features = service_result(session.api().features_list().await)?;
    render_feature_list(&features)
}
