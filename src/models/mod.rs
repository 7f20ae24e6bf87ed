mod conversation;
mod note;
mod notebook;
mod source;

pub use conversation::{Conversation, ConversationSummary, MessageItem, MessagePart, Role};
pub use note::{
    Block, BlockContent, CustomInline, InlineContent, LinkContent, NewNote, Note, NoteSummary,
    NoteUpdate, StyledText, TableContent, TableRow,
};
pub use notebook::{NewNotebook, Notebook};
pub use source::{FileFormat, ImportSource, SourceFile};
