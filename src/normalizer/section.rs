//! 技術要件セクションの切り出し

/// 開始キーワードから終了キーワードまでを切り出す
///
/// - 大文字小文字は無視
/// - 開始キーワードはリストの順に探し、最初に見つかったものを採用
/// - 終了キーワードも同様（開始位置より後ろのみ）。なければ末尾まで
/// - 開始キーワードが一つもなければ空文字
pub fn find_section<'a, S: AsRef<str>>(text: &'a str, starts: &[S], ends: &[S]) -> &'a str {
    // ASCIIのみ小文字化してバイト位置を元の文字列と揃える
    let lower = text.to_ascii_lowercase();

    let Some(start) = starts
        .iter()
        .filter(|kw| !kw.as_ref().is_empty())
        .find_map(|kw| lower.find(&kw.as_ref().to_ascii_lowercase()))
    else {
        return "";
    };

    let from = start + lower[start..].chars().next().map_or(0, char::len_utf8);
    let end = ends
        .iter()
        .filter(|kw| !kw.as_ref().is_empty())
        .find_map(|kw| {
            lower[from..]
                .find(&kw.as_ref().to_ascii_lowercase())
                .map(|i| from + i)
        })
        .unwrap_or(text.len());

    &text[start..end]
}
