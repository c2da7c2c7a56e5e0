//! 端末向けの結果表示

use crate::pipeline::featured::FeaturedAnalysis;
use crate::pipeline::{PipelineOutput, PostField, StepReport};
use crate::validate::ValidationIssue;
use blog_migrate_common::{AttachmentRecord, ThumbnailResolution};

/// 表示する検証エラーの上限
const MAX_ISSUES_SHOWN: usize = 10;

pub fn print_step_report(report: &StepReport) {
    if report.corrections.is_empty() {
        println!("✓ {}: 変更なし", report.step);
    } else {
        println!("✔ {}: {} 件", report.step, report.corrections.len());
    }

    for c in &report.corrections {
        let mark = if c.needs_review { "⚠" } else { "-" };
        match c.field {
            PostField::Added => println!("  {} 追加: {}", mark, c.corrected),
            PostField::Removed => println!(
                "  {} 削除: {} ({} を残す) [{}]",
                mark, c.original, c.corrected, c.title
            ),
            _ => {
                println!("  {} {} [{}] {}", mark, c.post_id, c.field, c.reason);
                if !c.original.is_empty() || !c.corrected.is_empty() {
                    println!("      {} → {}", c.original, c.corrected);
                }
            }
        }
    }
    for note in &report.notes {
        println!("  ・{}", note);
    }

    let review = report.review_count();
    if review > 0 {
        println!("  ⚠ 部分一致 {} 件は目視確認してください", review);
    }
}

pub fn print_pipeline_output(output: &PipelineOutput) {
    for report in &output.reports {
        print_step_report(report);
    }
    println!("\n投稿数: {}", output.posts.len());
}

pub fn print_featured_analysis(analysis: &FeaturedAnalysis) {
    println!("アイキャッチ画像の分析:");
    println!("  既に正しい: {} 件", analysis.correct);
    println!("  要修正: {} 件", analysis.corrections.len());
    println!("  サムネイル未設定: {} 件", analysis.not_declared);
    println!("  画像なし: {} 件", analysis.missing.len());

    if !analysis.corrections.is_empty() {
        println!("\n修正内容:");
        for fix in &analysis.corrections {
            let mark = if fix.tier.needs_review() { "⚠" } else { "-" };
            println!("  {} {} ({})", mark, fix.title, fix.tier);
            println!("      現在: {}", fix.current);
            println!("      修正: {}", fix.correct);
            println!("      WP: {}", fix.wp_file_name);
        }
    }

    if !analysis.missing.is_empty() {
        println!("\nローカルに無い画像:");
        for missing in &analysis.missing {
            println!("  - {}", missing);
        }
    }
}

pub fn print_validation_issues(issues: &[ValidationIssue]) {
    let (errors, warnings): (Vec<_>, Vec<_>) = issues.iter().partition(|i| i.is_error());
    print_issue_list("⚠ 検証の警告", &warnings);
    print_issue_list("❌ 検証エラー", &errors);
}

fn print_issue_list(label: &str, issues: &[&ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("{} {} 件:", label, issues.len());
    for issue in issues.iter().take(MAX_ISSUES_SHOWN) {
        println!("  {}", issue);
    }
    if issues.len() > MAX_ISSUES_SHOWN {
        println!("  ... 他 {} 件", issues.len() - MAX_ISSUES_SHOWN);
    }
}

/// `inspect` の1行
pub fn format_resolution(slug: &str, resolution: &ThumbnailResolution) -> String {
    match resolution {
        ThumbnailResolution::NotDeclared => format!("  · {}: サムネイル未設定", slug),
        ThumbnailResolution::MissingAttachment { attachment_id } => {
            format!("  ✗ {}: 添付ファイル {} が見つかりません", slug, attachment_id)
        }
        ThumbnailResolution::NoLocalFile(image) => {
            format!("  ✗ {}: {} (ローカルに無し)", slug, image.wp_file_name)
        }
        ThumbnailResolution::Resolved { image, path } => {
            let tier = image.tier().map(|t| t.to_string()).unwrap_or_default();
            let mark = if image.tier().is_some_and(|t| t.needs_review()) {
                "⚠"
            } else {
                "✓"
            };
            format!("  {} {}: {} → {} [{}]", mark, slug, image.wp_file_name, path, tier)
        }
    }
}

/// `inspect` で解決結果の下に出す添付ファイル情報
pub fn format_attachment(record: &AttachmentRecord) -> String {
    let parent = record
        .parent_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "なし".into());
    format!(
        "      添付 {} (スラッグ: {}, 親投稿: {})",
        record.id,
        record.slug.as_deref().unwrap_or("-"),
        parent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_migrate_common::{LocalMatch, MatchTier, ResolvedImage};

    fn resolved(tier: MatchTier) -> ThumbnailResolution {
        ThumbnailResolution::Resolved {
            image: ResolvedImage {
                attachment_id: 7,
                wp_file_name: "neve-300x200.jpg".into(),
                wp_url: "https://example.com/wp-content/uploads/neve-300x200.jpg".into(),
                local: Some(LocalMatch {
                    file_name: "neve.jpg".into(),
                    tier,
                }),
            },
            path: "assets/images/imagenes-blog/neve.jpg".into(),
        }
    }

    #[test]
    fn test_format_resolution() {
        let line = format_resolution("neve", &resolved(MatchTier::SizeSuffixStripped));
        assert!(line.starts_with("  ✓ neve:"));
        assert!(line.contains("サイズ接尾辞除去"));

        let fuzzy = format_resolution("neve", &resolved(MatchTier::Fuzzy));
        assert!(fuzzy.starts_with("  ⚠"));

        let missing = format_resolution(
            "ghost",
            &ThumbnailResolution::MissingAttachment {
                attachment_id: "99".into(),
            },
        );
        assert!(missing.contains("99"));
    }

    #[test]
    fn test_format_attachment() {
        let mut record = AttachmentRecord {
            id: 40,
            url: "https://example.com/wp-content/uploads/neve.jpg".into(),
            file_name: "neve.jpg".into(),
            slug: Some("neve".into()),
            parent_id: Some(12),
        };
        assert_eq!(
            format_attachment(&record),
            "      添付 40 (スラッグ: neve, 親投稿: 12)"
        );

        record.slug = None;
        record.parent_id = None;
        assert_eq!(
            format_attachment(&record),
            "      添付 40 (スラッグ: -, 親投稿: なし)"
        );
    }
}
