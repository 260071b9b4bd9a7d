use std::sync::Arc;

use super::args::{AdminCommand, CategoryCommand, Cli, Command, ProductCommand, SignUpArgs, TableArgs};
use super::console::{ConsoleNavigator, ConsoleNotifier};
use super::session::current_context;
use crate::application::admin::{
    DeleteCategory, DeleteProduct, ListAdminProducts, ListCategories, SaveCategory,
    SaveCategoryInput, SaveProduct, SaveProductInput, ADMIN_PAGE_SIZE,
};
use crate::application::auth::{SignIn, SignInInput, SignOut, SignUp, SignUpInput};
use crate::application::navigation::build_menu;
use crate::application::quiz::{JoinQuiz, LookupQuiz};
use crate::application::shop::{ListPurchases, ListShopProducts, PurchaseProduct};
use crate::domain::entities::PurchaseTab;
use crate::domain::services::{Navigator, Notifier, Page, PageMarker, TableState};
use crate::domain::value_objects::AuthContext;
use crate::infrastructure::app_state::AppState;
use crate::infrastructure::config::Config;
use crate::infrastructure::storage::ImageFile;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let navigator: Arc<dyn Navigator> = Arc::new(ConsoleNavigator);
    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let anonymous = AppState::supabase(&config, None, navigator.clone(), notifier.clone())?;

    match cli.command {
        Command::Signup(args) => sign_up(&anonymous, args).await,
        Command::Signin { email, password } => sign_in(&anonymous, email, password).await,
        Command::Lookup { code } => lookup(&anonymous, &code).await,
        command => {
            let ctx = current_context(&config, anonymous.auth.as_ref()).await?;
            let state = AppState::supabase(&config, ctx.as_ref(), navigator, notifier)?;
            dispatch(&state, ctx.as_ref(), command).await
        }
    }
}

async fn dispatch(state: &AppState, ctx: Option<&AuthContext>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Signout => {
            SignOut::new(state.auth.clone(), state.navigator.clone(), state.notifier.clone())
                .execute(ctx)
                .await?;
        }
        Command::Join { code, wait } => join(state, ctx, &code, wait).await?,
        Command::Menu => menu(state, ctx).await?,
        Command::Shop { page } => shop(state, ctx, page).await?,
        Command::Buy { product_id } => {
            let outcome = PurchaseProduct::new(
                state.shop_repo.clone(),
                state.profile_repo.clone(),
                state.notifier.clone(),
            )
            .execute(ctx, &product_id)
            .await?;
            println!("Purchase {} ({})", outcome.purchase.id, outcome.purchase.status.as_str());
            println!("Balance: {} points", outcome.new_balance);
        }
        Command::Purchases { tab } => purchases(state, ctx, tab).await?,
        Command::Admin(command) => admin(state, command).await?,
        Command::Signup(_) | Command::Signin { .. } | Command::Lookup { .. } => {}
    }
    Ok(())
}

async fn sign_up(state: &AppState, args: SignUpArgs) -> anyhow::Result<()> {
    let user = SignUp::new(state.auth.clone(), state.notifier.clone())
        .execute(SignUpInput {
            email: args.email,
            password: args.password,
            username: args.username,
            role: args.role.into(),
        })
        .await?;
    println!("Created account {}", user.id);
    Ok(())
}

async fn sign_in(state: &AppState, email: String, password: String) -> anyhow::Result<()> {
    let output = SignIn::new(
        state.auth.clone(),
        state.profile_repo.clone(),
        state.navigator.clone(),
        state.notifier.clone(),
    )
    .execute(SignInInput { email, password })
    .await?;

    if let Some(profile) = &output.profile {
        println!("{} ({})", profile.username, profile.role.as_str());
    }
    println!("BRAINBOOST_ACCESS_TOKEN={}", output.ctx.access_token);
    Ok(())
}

async fn lookup(state: &AppState, code: &str) -> anyhow::Result<()> {
    let preview = LookupQuiz::new(state.quiz_repo.clone(), state.notifier.clone())
        .execute(code)
        .await?;
    match preview {
        Some(preview) => {
            println!("{}  [{}]", preview.quiz.title, preview.code);
            println!("by {}, {} questions", preview.quiz.creator_label(), preview.quiz.question_count);
            if let Some(description) = &preview.quiz.description {
                println!("{}", description);
            }
            if let Some(message) = preview.joinability.message() {
                println!("{}", message);
            }
        }
        None => println!("No quiz found for '{}'", code),
    }
    Ok(())
}

async fn join(state: &AppState, ctx: Option<&AuthContext>, code: &str, wait: bool) -> anyhow::Result<()> {
    let Some(preview) = LookupQuiz::new(state.quiz_repo.clone(), state.notifier.clone())
        .execute(code)
        .await?
    else {
        println!("No quiz found for '{}'", code);
        return Ok(());
    };

    let output = JoinQuiz::new(
        state.quiz_repo.clone(),
        state.realtime.clone(),
        state.navigator.clone(),
        state.notifier.clone(),
    )
    .execute(&preview.quiz, ctx)
    .await?;

    println!(
        "Session {} ({}){}",
        output.session.id,
        output.session.status.as_str(),
        if output.registration.is_new() { "" } else { ", already joined" }
    );

    let Some(mut watch) = output.watch else {
        return Ok(());
    };
    if wait {
        println!("Waiting for the host to start the quiz (Ctrl-C to leave)...");
        tokio::select! {
            started = watch.wait_started() => {
                if !started {
                    println!("Lost the connection before the quiz started");
                }
            }
            _ = tokio::signal::ctrl_c() => println!("Leaving the waiting room"),
        }
    }
    watch.close().await;
    Ok(())
}

async fn menu(state: &AppState, ctx: Option<&AuthContext>) -> anyhow::Result<()> {
    let profile = match ctx {
        Some(ctx) => state.profile_repo.find_by_id(ctx.user_id()).await?,
        None => None,
    };
    let purchases = match &profile {
        Some(profile) if profile.is_student() => state.shop_repo.list_purchases(&profile.id).await?,
        _ => Vec::new(),
    };

    let menu = build_menu(ctx.map(|c| &c.user), profile.as_ref(), &purchases);
    if let Some(user) = &menu.user {
        match user.points {
            Some(points) => println!("[{}] {} - {} - {} points", user.initials, user.display_name, user.role_label, points),
            None => println!("[{}] {} - {}", user.initials, user.display_name, user.role_label),
        }
    }
    for item in &menu.items {
        match item.badge {
            Some(count) => println!("  {} ({})", item.label, count),
            None => println!("  {}", item.label),
        }
    }
    Ok(())
}

async fn shop(state: &AppState, ctx: Option<&AuthContext>, page: usize) -> anyhow::Result<()> {
    let shop = ListShopProducts::new(state.shop_repo.clone(), state.profile_repo.clone())
        .execute(ctx, page)
        .await?;

    println!("{} points available", shop.profile.points);
    for product in &shop.products.items {
        let affordable = if shop.profile.points >= product.points_required { "" } else { " (locked)" };
        println!("  {}  {} - {} pts{}", product.id, product.name, product.points_required, affordable);
    }
    println!("{}", render_strip(&shop.strip, shop.products.page));
    Ok(())
}

async fn purchases(state: &AppState, ctx: Option<&AuthContext>, tab: PurchaseTab) -> anyhow::Result<()> {
    let records = ListPurchases::new(state.shop_repo.clone(), state.profile_repo.clone())
        .execute(ctx, tab)
        .await?;

    println!("{} ({})", tab.label(), records.len());
    for record in &records {
        println!(
            "  {}  {} - {} pts - {}",
            record.created_at.format("%Y-%m-%d"),
            record.product_name(),
            record.points_spent,
            record.status.as_str()
        );
    }
    Ok(())
}

async fn admin(state: &AppState, command: AdminCommand) -> anyhow::Result<()> {
    match command {
        AdminCommand::Products(ProductCommand::List(args)) => {
            let page = ListAdminProducts::new(state.shop_repo.clone())
                .execute(&table(args))
                .await?;
            for product in &page.items {
                println!("  {}  {} - {} pts", product.id, product.name, product.points_required);
            }
            print_page_footer(&page);
        }
        AdminCommand::Products(ProductCommand::Save {
            id,
            name,
            description,
            points,
            image_url,
            image,
        }) => {
            let image = match image {
                Some(path) => Some(ImageFile::read(&path).await?),
                None => None,
            };
            SaveProduct::new(state.shop_repo.clone(), state.storage.clone())
                .execute(SaveProductInput {
                    id,
                    name,
                    description,
                    points_required: points,
                    image_url,
                    image,
                })
                .await?;
            println!("Product saved!");
        }
        AdminCommand::Products(ProductCommand::Delete { id }) => {
            DeleteProduct::new(state.shop_repo.clone()).execute(&id).await?;
            println!("Product deleted!");
        }
        AdminCommand::Categories(CategoryCommand::List(args)) => {
            let page = ListCategories::new(state.forum_repo.clone())
                .execute(&table(args))
                .await?;
            for category in &page.items {
                println!("  {}  {}", category.id, category.name);
            }
            print_page_footer(&page);
        }
        AdminCommand::Categories(CategoryCommand::Save { id, name }) => {
            SaveCategory::new(state.forum_repo.clone())
                .execute(SaveCategoryInput { id, name })
                .await?;
            println!("Category saved!");
        }
        AdminCommand::Categories(CategoryCommand::Delete { id }) => {
            DeleteCategory::new(state.forum_repo.clone()).execute(&id).await?;
            println!("Category and its posts deleted!");
        }
    }
    Ok(())
}

fn table(args: TableArgs) -> TableState {
    let mut table = TableState::new(ADMIN_PAGE_SIZE);
    table.set_search(args.search);
    table.set_page(args.page);
    table
}

fn print_page_footer<T>(page: &Page<T>) {
    println!("Page {} of {} ({} rows)", page.page, page.total_pages.max(1), page.total_items);
}

/// `1 ... 4 [5] 6 ... 10`
fn render_strip(strip: &[PageMarker], current: usize) -> String {
    strip
        .iter()
        .map(|marker| match marker {
            PageMarker::Number(n) if *n == current => format!("[{}]", n),
            PageMarker::Number(n) => n.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
