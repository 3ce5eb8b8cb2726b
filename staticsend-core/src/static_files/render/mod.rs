mod compose;
pub(crate) mod headers;

pub(crate) use compose::compose_response;
