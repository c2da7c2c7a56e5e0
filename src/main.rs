use blog_migrate::builder::{slugify, BuiltPost};
use blog_migrate::migrate::{build_posts, ExportSources};
use blog_migrate::pipeline::{
    analyze_featured_images, ApplyImageOverrides, CleanUploadUrls, DeduplicateByTitle,
    FixFeaturedImages, FixListMarkup, ImageOverrides, MergeImported, Pipeline, PostStep,
};
use blog_migrate::{cli, config, error, report, store, validate};
use blog_migrate_common::{resolve_thumbnail, BlogPost, ThumbnailResolution};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use dialoguer::Confirm;
use error::{MigrateError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

/// ログレベルを指定する環境変数
const LOG_ENV: &str = "BLOG_MIGRATE_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;
    let yes = cli.yes;

    match cli.command {
        Commands::Migrate {
            export,
            images,
            posts,
            output,
        } => cmd_migrate(&config, &export, &images_dir(images, &config), &posts, output, yes),

        Commands::FixImages {
            export,
            images,
            posts,
            output,
            dry_run,
        } => cmd_fix_images(
            &config,
            &export,
            &images_dir(images, &config),
            &posts,
            output,
            dry_run,
            yes,
        ),

        Commands::Dedupe {
            input,
            originals,
            output,
        } => cmd_dedupe(&input, originals, output, yes),

        Commands::Overrides {
            input,
            rules,
            output,
        } => {
            println!("🖼 blog-migrate - 画像の手動指定\n");
            let overrides = ImageOverrides::load(&rules)?;
            if overrides.is_empty() {
                tracing::warn!(path = %rules.display(), "上書きルールが空です");
            }
            run_single_step(
                ApplyImageOverrides::new(overrides, config.placeholder_image.clone()),
                &input,
                output,
                yes,
            )
        }

        Commands::CleanHtml { input, output } => {
            println!("🧹 blog-migrate - リスト修正\n");
            run_single_step(FixListMarkup, &input, output, yes)
        }

        Commands::CleanUrls { input, output } => {
            println!("🧹 blog-migrate - アップロードURL除去\n");
            run_single_step(CleanUploadUrls, &input, output, yes)
        }

        Commands::Run {
            export,
            images,
            posts,
            rules,
            output,
        } => cmd_run(
            &config,
            &export,
            &images_dir(images, &config),
            &posts,
            rules,
            output,
            yes,
        ),

        Commands::Inspect {
            export,
            images,
            slug,
        } => cmd_inspect(&config, &export, &images_dir(images, &config), slug.as_deref()),

        Commands::Config {
            show,
            set_author,
            set_upload_prefix,
        } => {
            let mut config = config;

            if let Some(author) = set_author {
                config.set_author(author)?;
                println!("✔ 著者名を設定しました");
            }

            if let Some(prefix) = set_upload_prefix {
                config.set_upload_url_prefix(prefix)?;
                println!("✔ アップロードURLの接頭辞を設定しました");
            }

            if show {
                println!("設定: {}", Config::config_path()?.display());
                println!("  画像ディレクトリ: {}", config.image_base_dir);
                println!("  プレースホルダ: {}", config.placeholder_image);
                println!("  著者: {}", config.author);
                println!("  アップロードURL: {}", config.upload_url_prefix);
                println!("  既定カテゴリ: {}", config.default_category);
                println!("  読了速度: {} 語/分", config.words_per_minute);
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let env_filter = match tracing_subscriber::EnvFilter::try_from_env(LOG_ENV) {
        Ok(f) => f,
        Err(_) => tracing_subscriber::EnvFilter::new(fallback),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn images_dir(images: Option<PathBuf>, config: &Config) -> PathBuf {
    images.unwrap_or_else(|| PathBuf::from(&config.image_base_dir))
}

fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    pb.set_style(style);
    pb.set_message(msg.to_string());
    pb
}

/// 公開投稿を変換し、プレースホルダ・要確認の投稿を表示
fn build_with_progress(sources: &ExportSources, config: &Config) -> Vec<BlogPost> {
    let today = chrono::Local::now().date_naive();
    let pb = create_progress_bar(sources.stats.published_posts as u64, "変換中");
    let built = build_posts(sources, config, today, |b| {
        pb.set_message(b.post.title.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();

    let replaced: usize = built.iter().map(|b| b.replaced_images).sum();
    println!("✔ {} 件を変換（本文画像 {} 件をローカルパスに置換）", built.len(), replaced);
    print_build_warnings(&built);

    built.into_iter().map(|b| b.post).collect()
}

fn print_build_warnings(built: &[BuiltPost]) {
    for b in built {
        if b.featured.is_placeholder() {
            println!("  ⚠ '{}' - プレースホルダ画像を使用", b.post.title);
        } else if b.featured.needs_review() {
            println!(
                "  ⚠ '{}' - 部分一致で決定、要確認: {}",
                b.post.title, b.post.featured_image
            );
        }
    }
}

/// 投稿が1件でも不正なら書き出さない
fn ensure_valid(posts: &[BlogPost]) -> Result<()> {
    let issues = validate::validate_posts(posts);
    report::print_validation_issues(&issues);
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(ToString::to_string)
        .collect();
    if !errors.is_empty() {
        return Err(MigrateError::Validation(errors));
    }
    println!("✔ {} 件の検証OK", posts.len());
    Ok(())
}

/// 既存ファイルを上書きする前に確認
fn confirm_overwrite(path: &Path, yes: bool) -> Result<()> {
    if yes || !path.exists() {
        return Ok(());
    }
    let confirmed = Confirm::new()
        .with_prompt(format!("{} を上書きしますか？", path.display()))
        .default(false)
        .interact()
        .map_err(|e| MigrateError::Io(std::io::Error::other(e.to_string())))?;
    if confirmed {
        Ok(())
    } else {
        Err(MigrateError::Aborted)
    }
}

fn write_posts(path: &Path, posts: &[BlogPost], yes: bool) -> Result<()> {
    confirm_overwrite(path, yes)?;
    store::save_posts(path, posts)?;
    println!("✔ 保存: {} ({} 件)", path.display(), posts.len());
    Ok(())
}

/// 移行前の投稿を `<file>.backup` に残す（既にあれば保持）
fn backup_before_migration(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let backup = store::backup_path(path);
    if backup.exists() {
        println!("- 既存のバックアップを保持: {}", backup.display());
        return Ok(());
    }
    let backup = store::backup_posts(path)?;
    println!("✔ バックアップ: {}", backup.display());
    Ok(())
}

fn cmd_migrate(
    config: &Config,
    export: &Path,
    images: &Path,
    posts: &Path,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    println!("📝 blog-migrate - WordPress移行\n");

    println!("[1/4] エクスポートを読み込み中...");
    let sources = ExportSources::load(export, images)?;
    sources.require_posts(export)?;
    println!(
        "✔ 公開投稿 {} 件 / 添付ファイル {} 件 / ローカル画像 {} 枚\n",
        sources.stats.published_posts,
        sources.attachments.attachment_count(),
        sources.images.len()
    );

    println!("[2/4] 投稿を変換中...");
    let imported = build_with_progress(&sources, config);
    println!();

    println!("[3/4] 既存の投稿と統合中...");
    let existing = store::load_posts_or_empty(posts)?;
    println!("- 既存: {} 件", existing.len());
    let merged = MergeImported::new(imported).apply(existing);
    report::print_step_report(&merged.report);
    println!();

    println!("[4/4] 検証中...");
    ensure_valid(&merged.posts)?;

    let target = output.unwrap_or_else(|| posts.to_path_buf());
    if target == posts {
        backup_before_migration(posts)?;
    }
    write_posts(&target, &merged.posts, yes)?;

    println!("\n✅ 移行完了");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_fix_images(
    config: &Config,
    export: &Path,
    images: &Path,
    posts: &Path,
    output: Option<PathBuf>,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    println!("🖼 blog-migrate - アイキャッチ画像修正\n");

    let sources = ExportSources::load(export, images)?;
    let current = store::load_posts(posts)?;
    let analysis = analyze_featured_images(
        &current,
        &sources.attachments,
        &sources.images,
        &config.image_base_dir,
    );
    report::print_featured_analysis(&analysis);

    if dry_run {
        println!("\n(ドライラン: 変更は保存していません)");
        return Ok(());
    }
    if analysis.corrections.is_empty() {
        println!("\n✓ 修正不要");
        return Ok(());
    }

    let step = FixFeaturedImages::new(
        &sources.attachments,
        &sources.images,
        &config.image_base_dir,
    );
    let fixed = step.apply(current);
    println!();
    let target = output.unwrap_or_else(|| posts.to_path_buf());
    write_posts(&target, &fixed.posts, yes)?;

    println!("\n✅ {} 件を修正", fixed.report.corrections.len());
    Ok(())
}

fn cmd_dedupe(
    input: &Path,
    originals: Option<PathBuf>,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    println!("🔁 blog-migrate - 重複除去\n");

    let posts = store::load_posts(input)?;
    let originals = originals.unwrap_or_else(|| store::backup_path(input));
    let manual_ids: Vec<String> = if originals.exists() {
        store::load_posts(&originals)?.into_iter().map(|p| p.id).collect()
    } else {
        tracing::warn!(path = %originals.display(), "手書き投稿の一覧が無いため、先に出た投稿を残します");
        Vec::new()
    };
    println!("- 投稿: {} 件 / 手書き: {} 件", posts.len(), manual_ids.len());

    let before = posts.len();
    let out = DeduplicateByTitle::new(manual_ids).apply(posts);
    report::print_step_report(&out.report);
    println!("- {} 件 → {} 件\n", before, out.posts.len());

    if out.report.is_empty() {
        return Ok(());
    }
    let target = output.unwrap_or_else(|| input.to_path_buf());
    write_posts(&target, &out.posts, yes)
}

/// 投稿JSONに1ステップだけ適用して保存
fn run_single_step(
    step: impl PostStep,
    input: &Path,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    let posts = store::load_posts(input)?;
    let out = step.apply(posts);
    report::print_step_report(&out.report);

    if out.report.is_empty() {
        return Ok(());
    }
    println!();
    let target = output.unwrap_or_else(|| input.to_path_buf());
    write_posts(&target, &out.posts, yes)
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    config: &Config,
    export: &Path,
    images: &Path,
    posts: &Path,
    rules: Option<PathBuf>,
    output: Option<PathBuf>,
    yes: bool,
) -> Result<()> {
    println!("🚀 blog-migrate - 一括処理\n");

    // ルールの誤りは変換前に検出する
    let overrides = rules.as_deref().map(ImageOverrides::load).transpose()?;
    if overrides.as_ref().is_some_and(ImageOverrides::is_empty) {
        tracing::warn!("上書きルールが空です");
    }

    println!("[1/4] エクスポートを読み込み中...");
    let sources = ExportSources::load(export, images)?;
    sources.require_posts(export)?;
    println!("✔ 公開投稿 {} 件\n", sources.stats.published_posts);

    println!("[2/4] 投稿を変換中...");
    let imported = build_with_progress(&sources, config);
    println!();

    println!("[3/4] 修正ステップを実行中...");
    let existing = store::load_posts_or_empty(posts)?;
    let manual_ids: Vec<String> = existing.iter().map(|p| p.id.clone()).collect();

    let mut pipeline = Pipeline::new()
        .with(MergeImported::new(imported))
        .with(DeduplicateByTitle::new(manual_ids))
        .with(FixFeaturedImages::new(
            &sources.attachments,
            &sources.images,
            &config.image_base_dir,
        ));
    if let Some(overrides) = overrides {
        pipeline = pipeline.with(ApplyImageOverrides::new(
            overrides,
            config.placeholder_image.clone(),
        ));
    }
    let pipeline = pipeline.with(FixListMarkup).with(CleanUploadUrls);
    println!("- ステップ: {}", pipeline.step_names().join(" → "));

    let out = pipeline.run(existing);
    report::print_pipeline_output(&out);
    println!();

    let target = output.unwrap_or_else(|| posts.to_path_buf());
    if !out.changed() && target == posts {
        println!("✓ 変更なし");
        return Ok(());
    }

    println!("[4/4] 検証中...");
    ensure_valid(&out.posts)?;

    if target == posts {
        backup_before_migration(posts)?;
    }
    write_posts(&target, &out.posts, yes)?;

    println!("\n✅ 完了");
    Ok(())
}

fn cmd_inspect(config: &Config, export: &Path, images: &Path, slug: Option<&str>) -> Result<()> {
    println!("🔍 blog-migrate - サムネイル解決結果\n");

    let sources = ExportSources::load(export, images)?;
    let mut shown = 0;
    let mut resolved = 0;

    for item in sources.published() {
        let post_slug = if item.post_name.is_empty() {
            slugify(&item.title)
        } else {
            item.post_name.clone()
        };
        if slug.is_some_and(|s| s != post_slug) {
            continue;
        }

        let resolution = resolve_thumbnail(
            &post_slug,
            &sources.attachments,
            &sources.images,
            &config.image_base_dir,
        );
        if resolution.path().is_some() {
            resolved += 1;
        }
        shown += 1;
        println!("{}", report::format_resolution(&post_slug, &resolution));

        let attachment_id = match &resolution {
            ThumbnailResolution::Resolved { image, .. }
            | ThumbnailResolution::NoLocalFile(image) => Some(image.attachment_id),
            _ => None,
        };
        if let Some(record) = attachment_id.and_then(|id| sources.attachments.attachment(id)) {
            println!("{}", report::format_attachment(record));
        }
    }

    if shown == 0 {
        println!("該当する投稿がありません");
    } else {
        println!("\n解決: {} / {} 件", resolved, shown);
    }
    Ok(())
}
