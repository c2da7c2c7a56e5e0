use crate::error::{MigrateError, Result};
use blog_migrate_common::{PostMeta, WpItem};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// 読み込み中の状態
#[derive(Default)]
struct ParseState {
    /// 開いている要素名
    stack: Vec<String>,
    text: String,
    item: Option<WpItem>,
    meta: Option<PostMeta>,
    category_domain: Option<String>,
    saw_channel: bool,
    items: Vec<WpItem>,
}

impl ParseState {
    fn parent(&self) -> Option<String> {
        self.stack.last().cloned()
    }

    fn open(&mut self, e: &BytesStart<'_>) {
        let name = element_name(e);
        let parent = self.parent();
        match (name.as_str(), parent.as_deref()) {
            ("channel", _) => self.saw_channel = true,
            ("item", Some("channel")) => self.item = Some(WpItem::default()),
            ("wp:postmeta", Some("item")) => self.meta = Some(PostMeta::default()),
            ("category", Some("item")) => {
                self.category_domain = e
                    .try_get_attribute("domain")
                    .ok()
                    .flatten()
                    .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()));
            }
            _ => {}
        }
        self.stack.push(name);
        self.text.clear();
    }

    fn close(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        let value = self.text.trim().to_string();
        self.text.clear();

        let parent = self.parent();
        match (name.as_str(), parent.as_deref()) {
            ("item", Some("channel")) => {
                if let Some(item) = self.item.take() {
                    self.items.push(item);
                }
            }
            ("wp:postmeta", Some("item")) => {
                if let (Some(item), Some(meta)) = (self.item.as_mut(), self.meta.take()) {
                    if !meta.key.is_empty() {
                        item.postmeta.push(meta);
                    }
                }
            }
            ("wp:meta_key", Some("wp:postmeta")) => {
                if let Some(meta) = self.meta.as_mut() {
                    meta.key = value;
                }
            }
            ("wp:meta_value", Some("wp:postmeta")) => {
                if let Some(meta) = self.meta.as_mut() {
                    meta.value = value;
                }
            }
            (field, Some("item")) => {
                let domain = self.category_domain.take();
                if let Some(item) = self.item.as_mut() {
                    assign_field(item, field, value, domain.as_deref());
                }
            }
            _ => {}
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn assign_field(item: &mut WpItem, field: &str, value: String, domain: Option<&str>) {
    match field {
        "title" => item.title = value,
        "link" => item.link = value,
        "pubDate" => item.pub_date = value,
        "wp:post_id" => item.post_id = value,
        "wp:post_date" => item.post_date = value,
        "wp:post_name" => item.post_name = value,
        "wp:post_type" => item.post_type = value,
        "wp:status" => item.status = value,
        "wp:post_parent" => item.post_parent = value,
        "wp:attachment_url" => item.attachment_url = value,
        "content:encoded" => item.content = value,
        "excerpt:encoded" => item.excerpt = value,
        "category" if !value.is_empty() => match domain {
            Some("category") => item.categories.push(value),
            Some("post_tag") => item.tags.push(value),
            _ => {}
        },
        _ => {}
    }
}

/// WXR文字列を解析して `<item>` の一覧を返す
///
/// XMLとして不正、または `channel` 要素が無い場合はエラー。
pub fn parse_export_str(xml: &str) -> Result<Vec<WpItem>> {
    let mut reader = Reader::from_str(xml);
    let mut state = ParseState::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => state.open(&e),
            Ok(Event::Empty(e)) => {
                state.open(&e);
                state.close();
            }
            Ok(Event::End(_)) => state.close(),
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(text) => state.text.push_str(&text),
                // HTMLエンティティ（&nbsp; など）はそのまま残す
                Err(_) => state.text.push_str(&String::from_utf8_lossy(&e)),
            },
            Ok(Event::CData(e)) => state.text.push_str(&String::from_utf8_lossy(&e)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(MigrateError::XmlParse(format!(
                    "位置 {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
    }

    if !state.stack.is_empty() {
        return Err(MigrateError::XmlParse(format!(
            "閉じられていない要素: {}",
            state.stack.join(" > ")
        )));
    }
    if !state.saw_channel {
        return Err(MigrateError::XmlParse("channel要素がありません".into()));
    }

    Ok(state.items)
}
