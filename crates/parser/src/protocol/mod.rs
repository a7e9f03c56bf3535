//! Protocol types shared by the codec and the parser driver.
//!
//! - **Code tables**: [`HttpMethod`] and [`HttpErrno`] map small integer codes to
//!   `'static` names and descriptions.
//! - **State** ([`ParserState`]): the fields a parser exposes to its readers.
//! - **Accessors** ([`ParserStateView`]): the read-only projections of a state,
//!   also available as the free functions [`get_method_name`],
//!   [`get_error_name`], [`get_error_description`] and [`get_status_code`].
//! - **Messages** ([`MessageHead`], [`Message`], [`PayloadItem`], [`PayloadSize`]):
//!   what the decoders produce.
//! - **Errors** ([`ParseError`]): decoder failures, each mapped to an [`HttpErrno`].

mod method;
pub use method::method_str;
pub use method::HttpMethod;
pub use method::UNKNOWN_METHOD;

mod errno;
pub use errno::HttpErrno;

mod state;
pub use state::ParserKind;
pub use state::ParserState;

mod view;
pub use view::get_error_description;
pub use view::get_error_name;
pub use view::get_method_name;
pub use view::get_status_code;
pub use view::ParserStateView;

mod head;
pub(crate) use head::HeaderIndex;
pub use head::MessageHead;
pub(crate) use head::StartLine;

mod message;
pub use message::Message;
pub use message::PayloadItem;
pub use message::PayloadSize;

mod error;
pub use error::ParseError;
pub use error::MAX_METHOD_TOKEN_LEN;
