//! Command-line front end for the catalog API

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::Table;

use catalog_server::{
    client::{CatalogClient, ClientBook, ClientResult},
    models::{Author, BookFilter, CreateAuthor, CreateBook, CreateTag, Tag, UpdateAuthor, UpdateBook, UpdateTag},
};

/// Browse and edit the library catalog.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API base URL (defaults to CATALOG_API_URL, then http://localhost:8000)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Books and their tags
    #[command(subcommand)]
    Books(BookCommands),
    /// Authors
    #[command(subcommand)]
    Authors(AuthorCommands),
    /// Tags
    #[command(subcommand)]
    Tags(TagCommands),
}

#[derive(Subcommand)]
enum BookCommands {
    /// List every book
    List,
    /// Search by author name, title or published year
    Search(SearchArgs),
    /// Show one book
    Show { id: i32 },
    /// Add a book
    Create(CreateBookArgs),
    /// Edit a book
    Edit(EditBookArgs),
    /// Delete a book and its tag links
    Delete { id: i32 },
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    year: Option<i32>,
}

#[derive(Args)]
struct CreateBookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    isbn: String,
    #[arg(long)]
    author_id: i32,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    summary: Option<String>,
    /// Tag id; repeat for several tags
    #[arg(long = "tag")]
    tags: Vec<i32>,
}

#[derive(Args)]
struct EditBookArgs {
    id: i32,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    author_id: Option<i32>,
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    summary: Option<String>,
    /// Replace the tags with these ids; repeat for several tags
    #[arg(long = "tag", conflicts_with = "clear_tags")]
    tags: Vec<i32>,
    /// Remove every tag from the book
    #[arg(long)]
    clear_tags: bool,
}

#[derive(Subcommand)]
enum AuthorCommands {
    List,
    Show { id: i32 },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        bio: Option<String>,
    },
    Edit {
        id: i32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    Delete { id: i32 },
}

#[derive(Subcommand)]
enum TagCommands {
    List,
    Show { id: i32 },
    Create {
        #[arg(long)]
        name: String,
    },
    Edit {
        id: i32,
        #[arg(long)]
        name: String,
    },
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_cli=warn,catalog_server=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = match cli.api_url {
        Some(url) => CatalogClient::new(url),
        None => CatalogClient::from_env(),
    };

    let result = match cli.command {
        Commands::Books(command) => run_books(&client, command).await,
        Commands::Authors(command) => run_authors(&client, command).await,
        Commands::Tags(command) => run_tags(&client, command).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(api = client.base_url(), "Catalog request failed: {}", e);
            eprintln!("Something went wrong while talking to the catalog. Please try again.");
            ExitCode::FAILURE
        }
    }
}

async fn run_books(client: &CatalogClient, command: BookCommands) -> ClientResult<()> {
    match command {
        BookCommands::List => print_books(&client.get_books().await?),
        BookCommands::Search(args) => {
            let filter = BookFilter {
                author_name: args.author,
                title: args.title,
                published_year: args.year,
            };
            print_books(&client.filter_books(&filter).await?);
        }
        BookCommands::Show { id } => print_books(&[client.get_book(id).await?]),
        BookCommands::Create(args) => {
            let book = client
                .create_book(&CreateBook {
                    title: args.title,
                    isbn: args.isbn,
                    published_year: args.year,
                    summary: args.summary,
                    author_id: args.author_id,
                    tags: Some(args.tags),
                })
                .await?;
            print_books(&[book]);
        }
        BookCommands::Edit(args) => {
            // The API replaces tags on every update, so keep the current ones unless told otherwise
            let tags = if args.clear_tags {
                Vec::new()
            } else if args.tags.is_empty() {
                client.get_book(args.id).await?.tags.iter().map(|t| t.id).collect()
            } else {
                args.tags
            };

            let book = client
                .update_book(
                    args.id,
                    &UpdateBook {
                        title: args.title,
                        isbn: args.isbn,
                        published_year: args.year.map(Some),
                        summary: args.summary.map(Some),
                        author_id: args.author_id,
                        tags: Some(tags),
                    },
                )
                .await?;
            print_books(&[book]);
        }
        BookCommands::Delete { id } => {
            client.delete_book(id).await?;
            println!("Book {} deleted", id);
        }
    }
    Ok(())
}

async fn run_authors(client: &CatalogClient, command: AuthorCommands) -> ClientResult<()> {
    match command {
        AuthorCommands::List => print_authors(&client.get_authors().await?),
        AuthorCommands::Show { id } => print_authors(&[client.get_author(id).await?]),
        AuthorCommands::Create { name, bio } => {
            let author = client.create_author(&CreateAuthor { name, bio }).await?;
            print_authors(&[author]);
        }
        AuthorCommands::Edit { id, name, bio } => {
            let author = client
                .update_author(id, &UpdateAuthor { name, bio: bio.map(Some) })
                .await?;
            print_authors(&[author]);
        }
        AuthorCommands::Delete { id } => {
            client.delete_author(id).await?;
            println!("Author {} deleted", id);
        }
    }
    Ok(())
}

async fn run_tags(client: &CatalogClient, command: TagCommands) -> ClientResult<()> {
    match command {
        TagCommands::List => print_tags(&client.get_tags().await?),
        TagCommands::Show { id } => print_tags(&[client.get_tag(id).await?]),
        TagCommands::Create { name } => {
            let tag = client.create_tag(&CreateTag { name }).await?;
            print_tags(&[tag]);
        }
        TagCommands::Edit { id, name } => {
            let tag = client.update_tag(id, &UpdateTag { name: Some(name) }).await?;
            print_tags(&[tag]);
        }
        TagCommands::Delete { id } => {
            client.delete_tag(id).await?;
            println!("Tag {} deleted", id);
        }
    }
    Ok(())
}

fn print_books(books: &[ClientBook]) {
    if books.is_empty() {
        println!("No books found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Author", "Year", "ISBN", "Tags"]);
    for book in books {
        let tags: Vec<&str> = book.tags.iter().map(|t| t.name.as_str()).collect();
        table.add_row(vec![
            book.id.to_string(),
            book.title.clone(),
            book.author.as_ref().map(|a| a.name.clone()).unwrap_or_default(),
            book.published_year.map(|y| y.to_string()).unwrap_or_default(),
            book.isbn.clone(),
            tags.join(", "),
        ]);
    }
    println!("{table}");
}

fn print_authors(authors: &[Author]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Bio"]);
    for author in authors {
        table.add_row(vec![
            author.id.to_string(),
            author.name.clone(),
            author.bio.clone().unwrap_or_default(),
        ]);
    }
    println!("{table}");
}

fn print_tags(tags: &[Tag]) {
    let mut table = Table::new();
    table.set_header(vec!["ID", "Name"]);
    for tag in tags {
        table.add_row(vec![tag.id.to_string(), tag.name.clone()]);
    }
    println!("{table}");
}
