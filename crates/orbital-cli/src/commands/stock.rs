use crate::client::{AppContext, CliResult, service_result};
use crate::output::render_stock_catalog;
use crate::session::Session;

pub(crate) async fn handle_stock(ctx: &AppContext) -> CliResult<()> {
    let session = Session::establish(ctx).await?;
    let catalog = service_result(session.api().stock().await)?;
    render_stock_catalog(&catalog);
    Ok(())
}
