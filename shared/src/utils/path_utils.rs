pub fn concat_path(first: &str, second: &str) -> String {
    let first = first.trim_end_matches('/');
    let second = second.trim_start_matches('/');
    match (first.is_empty(), second.is_empty()) {
        (true, true)   => String::new(),
        (true, false)  => second.to_string(),
        (false, true)  => first.to_string(),
        (false, false) => format!("{first}/{second}"),
    }
}
