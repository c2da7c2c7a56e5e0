use super::{PostCorrection, PostField, PostStep, StepOutput, StepReport};
use blog_migrate_common::BlogPost;
use regex::Regex;

lazy_static::lazy_static! {
    static ref LI_DIV_RE: Regex = Regex::new(r"<li>([^<]*)</div>").unwrap();
}

/// `</li>` が `</div>` になってしまったリストを直す
///
/// ギャラリー変換の副作用で壊れた項目が対象。`gallery-item` を含む行は触らない。
pub fn fix_list_markup(content: &str) -> String {
    let content = LI_DIV_RE.replace_all(content, "<li>$1</li>");

    let mut in_list = false;
    let lines: Vec<String> = content
        .split('\n')
        .map(|line| {
            if line.contains("<ul>") || line.contains("<ol>") {
                in_list = true;
            } else if line.contains("</ul>") || line.contains("</ol>") {
                in_list = false;
            }

            if in_list
                && line.contains("<li>")
                && line.contains("</div>")
                && !line.contains("gallery-item")
            {
                line.replace("</div>", "</li>")
            } else {
                line.to_string()
            }
        })
        .collect();
    lines.join("\n")
}

/// リスト修正ステップ
#[derive(Debug, Clone, Default)]
pub struct FixListMarkup;

impl PostStep for FixListMarkup {
    fn name(&self) -> &'static str {
        "fix-list-markup"
    }

    fn apply(&self, posts: Vec<BlogPost>) -> StepOutput {
        let mut report = StepReport::new(self.name());
        let mut posts = posts;

        for post in posts.iter_mut() {
            let fixed = fix_list_markup(&post.content);
            if fixed == post.content {
                continue;
            }
            report.corrections.push(PostCorrection::new(
                post,
                PostField::Content,
                "<li>…</div>",
                "<li>…</li>",
                "リスト項目の閉じタグ",
            ));
            post.content = fixed;
        }

        StepOutput { posts, report }
    }
}
