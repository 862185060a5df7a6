//! Restartable descriptions of the order animation parts play in.

/// One step of an animation script, referencing a part by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    /// Play the part once.
    Play(usize),
    /// Play the part a fixed number of times.
    Repeat { part: usize, times: u32 },
    /// Play the part forever; steps after a loop are unreachable.
    Loop(usize),
}

/// The logical order animation parts play in.
///
/// The script itself is inert data; driving it happens through a
/// [`ScriptCursor`]. Restarting means taking a fresh cursor, never
/// rewinding an old one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationScript {
    steps: Vec<ScriptStep>,
}

impl AnimationScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Single part played in an endless loop.
    pub fn looping(part: usize) -> Self {
        Self { steps: vec![ScriptStep::Loop(part)] }
    }

    /// Parts played once each, in order.
    pub fn sequence(parts: impl IntoIterator<Item = usize>) -> Self {
        Self { steps: parts.into_iter().map(ScriptStep::Play).collect() }
    }

    pub fn then_play(mut self, part: usize) -> Self {
        self.steps.push(ScriptStep::Play(part));
        self
    }

    pub fn then_repeat(mut self, part: usize, times: u32) -> Self {
        self.steps.push(ScriptStep::Repeat { part, times });
        self
    }

    pub fn then_loop(mut self, part: usize) -> Self {
        self.steps.push(ScriptStep::Loop(part));
        self
    }

    pub fn cursor(&self) -> ScriptCursor {
        ScriptCursor { steps: self.steps.clone(), position: 0, repeats_done: 0 }
    }
}

/// Pull-based iterator over a script's part indices.
#[derive(Clone, Debug)]
pub struct ScriptCursor {
    steps: Vec<ScriptStep>,
    position: usize,
    repeats_done: u32,
}

impl ScriptCursor {
    /// The next part index to play, or `None` when the script is over.
    pub fn next(&mut self) -> Option<usize> {
        let step = *self.steps.get(self.position)?;
        match step {
            ScriptStep::Play(part) => {
                self.position += 1;
                Some(part)
            }
            ScriptStep::Repeat { part, times } => {
                if times == 0 {
                    // A zero-repeat step plays nothing.
                    self.position += 1;
                    return self.next();
                }
                self.repeats_done += 1;
                if self.repeats_done >= times {
                    self.position += 1;
                    self.repeats_done = 0;
                }
                Some(part)
            }
            ScriptStep::Loop(part) => Some(part),
        }
    }
}
