/*!
   Predicates over the state strings reported by the chain CLI.

   Depending on the SDK version, channel and connection states are rendered
   either as the protobuf enum name (`STATE_OPEN`) or as the short form
   (`OPEN`). Client status is rendered as `Active`, `Expired`, `Frozen`, ...
*/

pub fn is_open_state(state: &str) -> bool {
    let state = state.trim().to_uppercase();
    state == "STATE_OPEN" || state == "OPEN"
}

pub fn is_active_status(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("active")
}
