use dotenv::dotenv;
use log::{error, info};
use picdrop::api::Db;
use picdrop::config::Config;
use picdrop::error::ConfigError;
use picdrop::export::{export_photos, ExportSelection};
use picdrop::kv::KvStore;
use picdrop::models::Page;
use picdrop::seed::EXAMPLE_ID;
use picdrop::share::ShareLinks;
use reqwest::Client;
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn page_id_arg() -> Result<String, ConfigError> {
	env::var("PAGE_ID").map_err(|_| ConfigError::Missing("PAGE_ID"))
}

async fn seed_example(db: &Db) -> Result<(), Box<dyn Error>> {
	match Page::get(db, EXAMPLE_ID).await? {
		Some(page) => println!("example page ready with {} photo(s)", page.photos.len()),
		None => error!("Example page could not be created"),
	}
	Ok(())
}

async fn list_pages(db: &Db) -> Result<(), Box<dyn Error>> {
	let pages = Page::list_all(db).await;
	println!("{} page(s)", pages.len());

	for page in pages {
		println!(
			"{}\t{}\t{}\t{} photo(s)",
			page.id,
			page.details.couple_names,
			page.details.owner().unwrap_or("-"),
			page.photos.len()
		);
	}
	Ok(())
}

async fn delete_page(db: &Db) -> Result<(), Box<dyn Error>> {
	let page_id = page_id_arg()?;
	Page::delete(db, &page_id).await?;
	println!("deleted {}", page_id);
	Ok(())
}

async fn export_page_photos(db: &Db) -> Result<(), Box<dyn Error>> {
	let page_id = page_id_arg()?;
	let dir = PathBuf::from(env::var("EXPORT_DIR").unwrap_or_else(|_| format!("export-{}", page_id)));

	let client = Client::new();
	let written = export_photos(db, &client, &page_id, &ExportSelection::AllPublic, &dir).await?;
	for path in written {
		println!("{}", path.display());
	}
	Ok(())
}

async fn share_links(db: &Db, config: &Config) -> Result<(), Box<dyn Error>> {
	let page_id = page_id_arg()?;
	let page = Page::get(db, &page_id)
		.await?
		.ok_or_else(|| picdrop::StoreError::NotFound(page_id.clone()))?;

	let links = ShareLinks::for_page(&config.public_base_url, &page.id, &page.details.couple_names);
	println!("page:     {}", links.page_url);
	println!("gallery:  {}", links.gallery_url);
	println!("facebook: {}", links.facebook);
	println!("twitter:  {}", links.twitter);
	println!("whatsapp: {}", links.whatsapp);
	println!("email:    {}", links.email);
	Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
	dotenv().ok();

	if std::env::var_os("RUST_LOG").is_none() {
		std::env::set_var("RUST_LOG", "picdrop=info");
	}
	env_logger::init();

	let config = Config::init();
	let options = config.store_options()?;
	info!("Opening store `{}` ({})", options.name, options.kind.label());

	let db = Db::new(KvStore::new(options));

	let command = config.command.clone().ok_or(ConfigError::Missing("COMMAND"))?;
	info!("COMMAND: {}", &command);

	match command.as_str() {
		"seed_example" => seed_example(&db).await?,
		"list_pages" => list_pages(&db).await?,
		"delete_page" => delete_page(&db).await?,
		"export_photos" => export_page_photos(&db).await?,
		"share_links" => share_links(&db, &config).await?,
		_ => error!("error in env (no such command): {}", command),
	}

	Ok(())
}
