use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-migrate")]
#[command(about = "WordPressエクスポート → 静的ブログJSON 移行・修正ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 上書き確認をスキップ
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// WordPressエクスポートを移行して投稿JSONに追加
    Migrate {
        /// WordPressエクスポート(WXR)ファイル
        #[arg(required = true)]
        export: PathBuf,

        /// ローカル画像フォルダ（デフォルト: 設定の image_base_dir）
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// 既存の投稿JSON
        #[arg(short, long, default_value = "data/blog-posts.json")]
        posts: PathBuf,

        /// 出力ファイル（省略時は --posts を上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// サムネイルIDからアイキャッチ画像を修正
    FixImages {
        /// WordPressエクスポート(WXR)ファイル
        #[arg(required = true)]
        export: PathBuf,

        /// ローカル画像フォルダ
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// 投稿JSON
        #[arg(short, long, default_value = "data/blog-posts.json")]
        posts: PathBuf,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ドライラン（変更を適用せずプレビュー）
        #[arg(long)]
        dry_run: bool,
    },

    /// タイトル重複を除去（手書きの投稿を優先）
    Dedupe {
        /// 投稿JSON
        #[arg(required = true)]
        input: PathBuf,

        /// 手書き投稿の一覧（デフォルト: 入力.backup）
        #[arg(long)]
        originals: Option<PathBuf>,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 手動指定のアイキャッチ画像を適用
    Overrides {
        /// 投稿JSON
        #[arg(required = true)]
        input: PathBuf,

        /// 上書きルールJSON（byId / byTitle / titleKeywords）
        #[arg(short, long, required = true)]
        rules: PathBuf,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 壊れたリストのマークアップを修正
    CleanHtml {
        /// 投稿JSON
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 残ったWordPressアップロードURLを除去
    CleanUrls {
        /// 投稿JSON
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 移行から修正まで一括実行
    Run {
        /// WordPressエクスポート(WXR)ファイル
        #[arg(required = true)]
        export: PathBuf,

        /// ローカル画像フォルダ
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// 既存の投稿JSON
        #[arg(short, long, default_value = "data/blog-posts.json")]
        posts: PathBuf,

        /// 上書きルールJSON
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// 出力ファイル（省略時は --posts を上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 投稿ごとのサムネイル解決結果を表示
    Inspect {
        /// WordPressエクスポート(WXR)ファイル
        #[arg(required = true)]
        export: PathBuf,

        /// ローカル画像フォルダ
        #[arg(short, long)]
        images: Option<PathBuf>,

        /// 特定の投稿のみ
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 著者名を設定
        #[arg(long)]
        set_author: Option<String>,

        /// アップロードURLの接頭辞を設定
        #[arg(long)]
        set_upload_prefix: Option<String>,
    },
}
