use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{PostId, ViewState};
use site_core::{
    blog_post_address,
    config::{load_settings_from, SETTINGS_FILE},
    editor::EditorMode,
    resolve_view_from_path, AdminConsole, ArchiveView, MemoryHistory, ScrollHandle, SiteShell,
    ViewRouter,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "site-console", about = "Operator console for the site content core")]
struct Cli {
    #[arg(long, default_value = SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which view an address resolves to.
    Route { address: String },
    /// List published posts, newest first.
    Posts,
    /// Print one post.
    Show { id: String },
    /// Create a post, or update one with --id.
    Publish {
        #[arg(long)]
        passphrase: String,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        /// File holding the post body markup.
        #[arg(long)]
        content_file: PathBuf,
        #[arg(long, default_value = "")]
        excerpt: String,
        #[arg(long, default_value = "")]
        image_url: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        read_time: String,
    },
    /// Permanently delete a post.
    Delete {
        id: String,
        #[arg(long)]
        passphrase: String,
        /// Confirm the deletion; without it nothing is sent.
        #[arg(long)]
        yes: bool,
    },
    /// Send a message through the contact relay.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
    },
}

type Shell = SiteShell<MemoryHistory>;

fn build_shell(cli: &Cli, address: &str) -> Result<Shell> {
    let settings = load_settings_from(&cli.config, |key| std::env::var(key).ok())?;
    let router = ViewRouter::new(MemoryHistory::new(address), ScrollHandle::headless());
    Ok(SiteShell::new(router, &settings))
}

async fn unlocked_console<'a>(
    shell: &'a mut Shell,
    passphrase: &str,
) -> Result<&'a mut AdminConsole> {
    shell.navigate("/admin").await;
    let console = shell.admin_mut().context("admin view did not mount")?;
    if console.is_unconfigured() {
        bail!("content service not configured; set APP__CONTENT_URL and APP__CONTENT_API_KEY");
    }
    console.set_passphrase(passphrase);
    if !console.submit_passphrase().await {
        bail!("passphrase rejected");
    }
    if console.is_unconfigured() {
        bail!("content service unreachable");
    }
    Ok(console)
}

async fn list_posts(cli: &Cli) -> Result<()> {
    let mut shell = build_shell(cli, "/blog")?;
    shell.start().await;
    let blog = shell.blog();
    match blog.state() {
        ArchiveView::LinkRequired => bail!("database link required: content service unavailable"),
        _ if blog.is_empty() => println!("archive is empty"),
        _ => {
            for post in blog.posts() {
                println!(
                    "{}  {}  {:<12} {}",
                    post.created_at.format("%Y-%m-%d"),
                    post.id.short(),
                    post.category,
                    post.title
                );
            }
        }
    }
    Ok(())
}

async fn show_post(cli: &Cli, id: &str) -> Result<()> {
    let mut shell = build_shell(cli, "/")?;
    shell.start().await;
    shell.navigate(&blog_post_address(&PostId::new(id))).await;
    let blog = shell.blog();
    if blog.state() == ArchiveView::LinkRequired {
        bail!("database link required: content service unavailable");
    }
    let post = blog
        .selected()
        .with_context(|| format!("post {id} not found"))?;
    println!("{}", post.title);
    println!(
        "{} | {} | {}",
        post.category,
        post.read_time,
        post.created_at.format("%B %e, %Y")
    );
    println!();
    for paragraph in post.paragraphs() {
        println!("{paragraph}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Route { address } => {
            let view = resolve_view_from_path(address);
            match view.canonical_path() {
                Some(path) => println!("{view} ({path})"),
                None => println!("{view}"),
            }
            if view == ViewState::Blog {
                let router =
                    ViewRouter::new(MemoryHistory::new(address.as_str()), ScrollHandle::headless());
                if let Some(id) = router.query_param("id") {
                    println!("deep link: post {id}");
                }
            }
        }
        Command::Posts => list_posts(&cli).await?,
        Command::Show { id } => show_post(&cli, id).await?,
        Command::Publish {
            passphrase,
            id,
            title,
            content_file,
            excerpt,
            image_url,
            category,
            read_time,
        } => {
            let content = fs::read_to_string(content_file)
                .with_context(|| format!("failed to read '{}'", content_file.display()))?;
            let mut shell = build_shell(&cli, "/")?;
            let console = unlocked_console(&mut shell, passphrase).await?;

            match id {
                Some(id) => console.begin_edit(&PostId::new(id.as_str()))?,
                None => console.begin_new()?,
            }
            let draft = console.draft_mut().context("no draft open")?;
            draft.title = title.clone();
            draft.excerpt = excerpt.clone();
            draft.image_url = image_url.clone();
            draft.category = category.clone();
            draft.read_time = read_time.clone();
            let editor = console.editor_mut().context("no editor open")?;
            editor.set_mode(EditorMode::Markup);
            editor.set_markup(content);

            let saved = console.save().await?;
            info!(id = %saved.id, "publish complete");
            println!("saved post id={} slug={}", saved.id, saved.slug);
        }
        Command::Delete { id, passphrase, yes } => {
            let mut shell = build_shell(&cli, "/")?;
            let console = unlocked_console(&mut shell, passphrase).await?;
            let id = PostId::new(id.as_str());
            console.request_delete(&id)?;
            if !*yes {
                println!("post {id} would be permanently deleted; rerun with --yes to confirm");
                console.cancel_delete();
                return Ok(());
            }
            console.confirm_delete().await?;
            println!("deleted post id={id}");
        }
        Command::Contact {
            name,
            email,
            subject,
            message,
        } => {
            let mut shell = build_shell(&cli, "/")?;
            shell.start().await;
            shell.navigate("/contact").await;
            let form = shell.contact_mut().context("contact view did not mount")?;
            form.fields.name = name.clone();
            form.fields.email = email.clone();
            form.fields.subject = subject.clone();
            form.fields.message = message.clone();
            shell
                .submit_contact()
                .await
                .context("contact view did not mount")??;
            println!("message sent");
        }
    }

    Ok(())
}
