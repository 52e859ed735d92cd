use serde_json::Value;

/// A single step of a (simplified) JSONPath expression: a `.key` / `['key']`
/// property access or a `[n]` array index. Shared between the JSONPath reader
/// (`jsonpath_lib`, used for evaluation) and this module's "mutate by path"
/// inverse (used for reshaping), since both must agree on escaping for
/// numeric indices.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

pub fn parse_path(path: &str) -> Vec<PathSegment> {
    let rest = path.strip_prefix('$').unwrap_or(path);
    let chars: Vec<char> = rest.chars().collect();
    let mut segments = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '.' => i += 1,
            '[' => {
                let end = chars[i..].iter().position(|&c| c == ']').map(|p| p + i).unwrap_or(chars.len());
                let inner: String = chars[i + 1..end].iter().collect();
                let inner = inner.trim_matches(|c| c == '\'' || c == '"');
                match inner.parse::<usize>() {
                    Ok(index) => segments.push(PathSegment::Index(index)),
                    Err(_) => segments.push(PathSegment::Key(inner.to_string())),
                }
                i = end + 1;
            }
            _ => {
                let end = chars[i..].iter().position(|&c| c == '.' || c == '[').map(|p| p + i).unwrap_or(chars.len());
                let key: String = chars[i..end].iter().collect();
                if !key.is_empty() {
                    segments.push(PathSegment::Key(key));
                }
                i = end;
            }
        }
    }
    segments
}

pub fn first_segment_is(path: &str, key: &str) -> bool {
    matches!(parse_path(path).first(), Some(PathSegment::Key(k)) if k == key)
}

/// Writes `value` at `path` within `root`, creating intermediate objects and
/// arrays as needed. The inverse of `parse_path` + JSONPath evaluation.
pub fn set_by_path(root: &mut Value, path: &str, value: Value) {
    let segments = parse_path(path);
    set_segments(root, &segments, value);
}

fn set_segments(node: &mut Value, segments: &[PathSegment], value: Value) {
    let Some((segment, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    match segment {
        PathSegment::Key(key) => {
            if !node.is_object() {
                *node = Value::Object(Default::default());
            }
            let map = node.as_object_mut().unwrap();
            let entry = map.entry(key.clone()).or_insert(Value::Null);
            if rest.is_empty() {
                *entry = value;
            } else {
                set_segments(entry, rest, value);
            }
        }
        PathSegment::Index(index) => {
            if !node.is_array() {
                *node = Value::Array(Default::default());
            }
            let array = node.as_array_mut().unwrap();
            while array.len() <= *index {
                array.push(Value::Null);
            }
            if rest.is_empty() {
                array[*index] = value;
            } else {
                set_segments(&mut array[*index], rest, value);
            }
        }
    }
}

/// Navigates to the node at `segments`, if present, without creating anything.
pub fn node_at<'a>(root: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            PathSegment::Key(key) => node.get(key)?,
            PathSegment::Index(index) => node.get(index)?,
        };
    }
    Some(node)
}
