/*!
 * # Editing Core Module
 *
 * A hybrid editor shows a region of structured content as a flat row of
 * tokens the user types into like text, while a parsed value is kept in
 * step with those tokens on every edit.
 *
 * ## Architecture Overview
 *
 * ### 1. Tokens Are the Source of Truth
 * - The **`TokenListEditor`** owns the token list and one **`TokenView`** per token
 * - Every mutation reparses; when the tokens parse, the value is printed back
 *   and must yield as many tokens as were parsed
 * - A region that does not parse keeps its tokens and reports itself invalid
 *
 * ### 2. Stable Views
 * - Views carry a **`ViewId`** that survives edits around them
 * - Normalising to printed tokens rewrites only the tokens that differ, so
 *   the focused view and its caret stay put
 *
 * ### 3. Structural Edits
 * - **`TokenOperations`** deletes, merges, splits and expands tokens
 * - Every edit yields a **`CursorAction`** saying where focus goes next
 *
 * ### 4. Completion
 * - A **`Completer`** places completed tokens: replacing a token, inserting
 *   beside one, or filling the empty region
 * - **`TokenCompleter`** builds suppliers and resolves text with no position
 *
 * ### 5. Key-Level Driver
 * - **`HybridEditor`** turns typing, deletion, paste and menu keys into the
 *   edits above, and tracks focus, selection and the completion menu
 *
 * ## Usage Pattern
 *
 * ```rust,ignore
 * let mut editor = HybridEditor::new(spec, &EditorSettings::default());
 *
 * editor.type_text("a+b")?;
 * assert!(editor.is_valid());
 *
 * editor.select_token(1, SelectionPosition::Last);
 * editor.type_char('+')?;
 * ```
 */

pub mod hybrid_editor;
mod pairing;
pub mod selection;
pub mod token_completer;
pub mod token_list_editor;
pub mod token_operations;
pub mod view;

pub use hybrid_editor::{Focus, HybridEditor};
pub use selection::{CursorAction, CursorTarget, SelectionPosition};
pub use token_completer::{
    Completer, PlaceholderCompleter, ReplaceTokenCompleter, SideTransformCompleter,
    TokenCompleter,
};
pub use token_list_editor::TokenListEditor;
pub use token_operations::TokenOperations;
pub use view::{TokenView, ViewId};
