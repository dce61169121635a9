//! One function per subcommand, each driving a view controller.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use dishbook_client::views::{
    DeleteOutcome, DetailState, DishDetailView, DishFormView, DishListView, Navigation,
};
use dishbook_client::ImageFile;
use dishbook_core::types::DishId;

use crate::context::Context;
use crate::output::Output;

/// Ask on the terminal; anything but `y`/`yes` declines.
fn prompt(question: &str) -> bool {
    print!("{question} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn always(_: &str) -> bool {
    true
}

fn flash(out: &Output, navigation: &Navigation) {
    if let Navigation::List { message: Some(message) } = navigation {
        out.message(message);
    }
}

pub async fn list(ctx: &Context, out: &Output, search: Option<&str>) -> Result<()> {
    let view = DishListView::new(ctx.gate.clone(), ctx.reader.clone(), ctx.writer.clone());
    view.load().await?;
    if let Some(term) = search {
        view.set_search_term(term).await;
    }
    out.dishes(&view.displayed().await);
    Ok(())
}

pub async fn show(ctx: &Context, out: &Output, id: DishId) -> Result<()> {
    let view = DishDetailView::new(ctx.gate.clone(), ctx.reader.clone(), ctx.writer.clone(), id);
    view.load().await?;
    match view.state().await {
        DetailState::Found { dish, .. } => {
            out.dish(&dish);
            Ok(())
        }
        DetailState::NotFound => bail!("Dish {id} not found"),
        DetailState::Error(message) => Err(anyhow!(message)),
        DetailState::Loading => bail!("Dish {id} did not load"),
    }
}

pub async fn add(
    ctx: &Context,
    out: &Output,
    name: &str,
    ingredients: &str,
    image: Option<&Path>,
) -> Result<()> {
    let form = DishFormView::create(ctx.gate.clone(), ctx.writer.clone());
    form.set_name(name).await;
    form.set_ingredients_text(ingredients).await;
    if let Some(path) = image {
        form.select_image(ImageFile::from_path(path).await?).await;
    }

    let saved = form.submit().await?;
    flash(out, &saved.navigation);
    out.dish(&saved.dish);
    Ok(())
}

pub async fn edit(
    ctx: &Context,
    out: &Output,
    id: DishId,
    name: Option<&str>,
    ingredients: Option<&str>,
    image: Option<&Path>,
) -> Result<()> {
    let session = ctx.gate.require_session()?;
    let current = ctx
        .reader
        .get_dish(&session, id)
        .await?
        .ok_or_else(|| anyhow!("Dish {id} not found"))?;

    let form = DishFormView::edit(ctx.gate.clone(), ctx.writer.clone(), &current);
    if let Some(name) = name {
        form.set_name(name).await;
    }
    if let Some(text) = ingredients {
        form.set_ingredients_text(text).await;
    }
    if let Some(path) = image {
        form.select_image(ImageFile::from_path(path).await?).await;
    }

    let saved = form.submit().await?;
    flash(out, &saved.navigation);
    out.dish(&saved.dish);
    Ok(())
}

pub async fn delete(ctx: &Context, out: &Output, id: DishId, yes: bool) -> Result<()> {
    let view = DishListView::new(ctx.gate.clone(), ctx.reader.clone(), ctx.writer.clone());
    let outcome = if yes {
        view.delete(id, &always).await?
    } else {
        view.delete(id, &prompt).await?
    };
    match outcome {
        DeleteOutcome::Deleted => out.message(dishbook_client::views::DISH_DELETED),
        DeleteOutcome::Declined => out.message("Cancelled."),
    }
    Ok(())
}
