use crate::Chunk;

pub const DEFAULT_CONTEXT_TOKEN_BUDGET: usize = 2000;

const QUESTION_PREFIX: &str = "Please answer this question: ";
const CONTEXT_HEADER: &str = "*** Code: ";

/// The chunks that fit the budget, in the order they were offered.
#[derive(Debug, Clone)]
pub struct ContextSelection<'a> {
    pub chunks: Vec<&'a Chunk>,
    pub tokens_used: usize,
    pub tokens_remaining: usize,
}

/// Takes chunks from the front of `ranked` while their cumulative token count
/// stays within `budget`. The first chunk that does not fit ends the selection;
/// later, smaller chunks are never used to fill the gap.
pub fn select_context<'a, I>(ranked: I, budget: usize) -> ContextSelection<'a>
where
    I: IntoIterator<Item = &'a Chunk>,
{
    let mut tokens_remaining = budget;
    let mut chunks = Vec::new();

    for chunk in ranked {
        if chunk.tokens > tokens_remaining {
            break;
        }
        tokens_remaining -= chunk.tokens;
        chunks.push(chunk);
    }

    ContextSelection {
        chunks,
        tokens_used: budget - tokens_remaining,
        tokens_remaining,
    }
}

/// Instruction line with the question, the context header, then every selected
/// chunk on its own line(s) in selection order.
pub fn build_prompt(question: &str, context: &[&Chunk]) -> String {
    let mut prompt = String::with_capacity(
        QUESTION_PREFIX.len()
            + question.len()
            + CONTEXT_HEADER.len()
            + context.iter().map(|c| c.content.len() + 1).sum::<usize>()
            + 2,
    );

    prompt.push_str(QUESTION_PREFIX);
    prompt.push_str(question);
    prompt.push('\n');
    prompt.push_str(CONTEXT_HEADER);
    prompt.push('\n');
    for chunk in context {
        prompt.push_str(&chunk.content);
        prompt.push('\n');
    }

    prompt
}
