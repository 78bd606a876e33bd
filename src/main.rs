// Copyright 2018 Dario Domizioli
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use amdify::{
    AmdifyError, DemoRewritePass, HtmlExporterPass, LessGenerator, LocalPass, PageDirs, Post,
    PostCollection, PostOrigin, ReadOnlyPass, Rewriter, SiteConfig,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "amdify")]
#[command(about = "Rewrite legacy namespace modules into AMD modules, and build the blog around the demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a snippet into an AMD module (reads stdin without a file)
    Rewrite {
        file: Option<PathBuf>,
    },
    /// Rewrite the demo code blocks of posts and export them as HTML
    Post {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Directory the HTML files are written to
        #[arg(long, default_value = "_site")]
        output: PathBuf,
    },
    /// Compile the site's LESS stylesheets with lessc
    Less {
        #[arg(long, default_value = "_config.yml")]
        config: PathBuf,
    },
    /// Print the asset directories of a post url as JSON
    PageDirs {
        url: String,
    },
}

fn main() -> Result<(), AmdifyError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amdify=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Rewrite { file } => {
            let source = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };
            print!("{}", Rewriter::legacy()?.rewrite(&source));
        }
        Command::Post { files, output } => {
            let texts = files
                .iter()
                .map(fs::read_to_string)
                .collect::<Result<Vec<_>, _>>()?;
            let posts = texts
                .iter()
                .zip(&files)
                .map(|(text, path)| Post::parse(text, PostOrigin::MarkdownFile(path.clone())))
                .collect();
            let mut posts = PostCollection::from_posts(posts);

            let mut demo_pass = DemoRewritePass::new(Rewriter::legacy()?);
            let mut modules = Vec::new();
            posts
                .posts_iter_mut()
                .try_for_each(|post| demo_pass.apply(post, &mut modules))?;

            fs::create_dir_all(&output)?;
            let mut exporter = HtmlExporterPass::new(&output)?;
            let mut written = Vec::new();
            exporter.apply(&posts, &mut written)?;
            println!("Rewrote {} demo block(s) in {} post(s)", modules.len(), posts.len());
            for path in written {
                println!("  {}", path.display());
            }
        }
        Command::Less { config } => {
            let mut site_config = if config.exists() {
                SiteConfig::load(&config)?
            } else {
                SiteConfig::default()
            };
            let generated = LessGenerator::locate().generate(&mut site_config)?;
            if site_config.use_lessjs {
                println!("lessc not found; pages should use less.js");
            }
            for file in generated {
                println!("  {}", file.dir.join(&file.name).display());
            }
        }
        Command::PageDirs { url } => {
            let dirs = PageDirs::from_url(&url);
            println!("{}", serde_json::to_string_pretty(&dirs)?);
        }
    }
    Ok(())
}
