/// Short province names keyed by the fragments that identify them in a
/// full or abbreviated region label. First match wins.
const REGION_ALIASES: [(&[&str], &str); 17] = [
    (&["서울"], "서울"),
    (&["부산"], "부산"),
    (&["대구"], "대구"),
    (&["인천"], "인천"),
    (&["광주"], "광주"),
    (&["대전"], "대전"),
    (&["울산"], "울산"),
    (&["세종"], "세종"),
    (&["경기"], "경기"),
    (&["강원"], "강원"),
    (&["충북", "충청북"], "충북"),
    (&["충남", "충청남"], "충남"),
    (&["전북", "전라북"], "전북"),
    (&["전남", "전라남"], "전남"),
    (&["경북", "경상북"], "경북"),
    (&["경남", "경상남"], "경남"),
    (&["제주"], "제주"),
];

/// Reduce a region label such as "충청북도" or "서울특별시 강남구" to the
/// short province name used by listings. Unknown labels pass through with
/// only the first whitespace-separated token kept.
pub(crate) fn normalize_region(value: &str) -> String {
    let head = clean(value)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string();

    REGION_ALIASES
        .iter()
        .find(|(fragments, _)| fragments.iter().any(|fragment| head.contains(fragment)))
        .map(|(_, short)| short.to_string())
        .unwrap_or(head)
}

/// Strip zero-width characters and collapse inner whitespace.
pub(crate) fn normalize_text(value: &str) -> String {
    clean(value).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "")
}
