//! List resolved site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::i18n::Locale;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let site = folio.load_site()?;
            for locale in Locale::ALL {
                let posts = site.posts_by_date(locale);
                println!("Posts [{}] ({}):", locale, posts.len());
                for post in posts {
                    println!(
                        "  {} - {} [{}] {}",
                        post.published_at.with_timezone(&folio.tz).format("%Y-%m-%d"),
                        post.title,
                        post.source.display(),
                        post.path
                    );
                }
            }
        }
        "tag" | "tags" => {
            let site = folio.load_site()?;
            for locale in Locale::ALL {
                let tags: Vec<_> = site.tags().in_locale(locale).collect();
                println!("Tags [{}] ({}):", locale, tags.len());
                for tag in tags {
                    println!("  #{} ({}) {}", tag.name, tag.posts.len(), tag.path);
                }
            }
        }
        "source" | "sources" => {
            // Checked one file at a time, so problems show up as they are found
            let mut failed = 0;
            for source in ContentLoader::new(folio).sources() {
                match source {
                    Ok(post) => println!("  ok  [{}] {}", post.locale, post.source.display()),
                    Err(errors) => {
                        failed += 1;
                        for e in errors.iter() {
                            println!("  err [{}] {}", e.kind(), e);
                        }
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} source(s) failed to load", failed);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag, source", content_type);
        }
    }

    Ok(())
}
