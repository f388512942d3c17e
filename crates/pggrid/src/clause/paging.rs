//! LIMIT/OFFSET construction.

use crate::request::TableRequest;

/// Build the paging fragment for a request.
///
/// Emits `LIMIT <length> OFFSET <start>` when the request carries a `start`
/// and its `length` is not `-1` (the wire's "all rows" marker). A missing
/// `length` loose-reads as 0 and pages zero rows.
///
/// Both values are loose-coerced integers formatted directly into the
/// fragment. They must not consume bindings: the binding list belongs to the
/// WHERE fragment and is reused verbatim by the count queries, which take no
/// LIMIT.
pub fn paging(request: &TableRequest) -> String {
    let Some(start) = request.start else {
        return String::new();
    };
    let length = request.length.map_or(0, |l| l.value());
    if length == -1 {
        return String::new();
    }
    format!("LIMIT {} OFFSET {}", length, start.value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::LooseInt;

    #[test]
    fn emits_limit_and_offset() {
        let request = TableRequest {
            start: Some(LooseInt(20)),
            length: Some(LooseInt(10)),
            ..TableRequest::default()
        };
        assert_eq!(paging(&request), "LIMIT 10 OFFSET 20");
    }

    #[test]
    fn length_minus_one_disables_paging() {
        let request = TableRequest {
            start: Some(LooseInt(0)),
            length: Some(LooseInt(-1)),
            ..TableRequest::default()
        };
        assert_eq!(paging(&request), "");
    }

    #[test]
    fn missing_start_disables_paging() {
        let request = TableRequest {
            length: Some(LooseInt(10)),
            ..TableRequest::default()
        };
        assert_eq!(paging(&request), "");
    }

    #[test]
    fn missing_length_pages_zero_rows() {
        let request = TableRequest {
            start: Some(LooseInt(5)),
            ..TableRequest::default()
        };
        assert_eq!(paging(&request), "LIMIT 0 OFFSET 5");
    }
}
