//! Scripted typing demo.
//!
//! The demo types out a list of lines into the document one character at a
//! time. Lines taken from a heading source pause after the last character
//! and are then run through the trigger detector, so the reader sees the
//! `# ` prefix turn into a real heading.
//!
//! `DemoPlayer` is a plain state machine. Each [`DemoPlayer::advance`] does
//! one unit of work against the host and reports how long the caller should
//! wait before the next call; the caller owns the timers.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::EditorConfig;
use crate::convert::BlockConverter;
use crate::platform::{CaretTarget, EditorHost, HostError};
use crate::tag::BlockTag;

/// One line of demo text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoLine {
    pub text: String,
    /// Run the trigger detector on the line once typed.
    pub convert: bool,
}

impl DemoLine {
    pub fn new(text: impl Into<String>, convert: bool) -> Self {
        Self {
            text: text.into(),
            convert,
        }
    }

    /// Gather demo lines from the elements carrying the configured class.
    /// Lines sourced from an `h1` are converted after typing.
    pub fn collect<H: EditorHost>(host: &H, config: &EditorConfig) -> Vec<Self> {
        host.elements_with_class(config.demo_class)
            .iter()
            .map(|source| {
                let convert = host
                    .tag_name(source)
                    .and_then(|tag| BlockTag::from_tag_name(&tag))
                    == Some(BlockTag::H1);
                DemoLine::new(host.text_content(source), convert)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoPhase {
    Printing,
    Paused,
    Done,
}

/// What the caller should do before the next `advance`.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoTick<N> {
    /// Sleep, then advance.
    Wait(Duration),
    /// Show a blinking cursor after `anchor` for `duration`, then advance.
    Pause { duration: Duration, anchor: N },
    /// Nothing left to play.
    Done,
}

#[derive(Debug)]
pub struct DemoPlayer<N> {
    lines: VecDeque<DemoLine>,
    current: Option<ActiveLine<N>>,
    phase: DemoPhase,
    converter: BlockConverter,
    ms_per_character: Duration,
    pause_duration: Duration,
}

#[derive(Debug)]
struct ActiveLine<N> {
    element: N,
    remaining: VecDeque<char>,
    convert: bool,
}

impl<N: Clone + PartialEq + std::fmt::Debug> DemoPlayer<N> {
    pub fn new(lines: Vec<DemoLine>, converter: BlockConverter, config: &EditorConfig) -> Self {
        Self {
            lines: lines.into(),
            current: None,
            phase: DemoPhase::Printing,
            converter,
            ms_per_character: config.ms_per_character,
            pause_duration: config.pause_duration,
        }
    }

    pub fn phase(&self) -> DemoPhase {
        self.phase
    }

    /// The element currently being typed into.
    pub fn active_element(&self) -> Option<&N> {
        self.current.as_ref().map(|line| &line.element)
    }

    /// Do one step of work.
    pub fn advance<H>(&mut self, host: &mut H) -> Result<DemoTick<N>, HostError>
    where
        H: EditorHost<Node = N>,
    {
        match self.phase {
            DemoPhase::Done => Ok(DemoTick::Done),
            DemoPhase::Paused => {
                self.finish_pause(host)?;
                self.print(host)
            }
            DemoPhase::Printing => self.print(host),
        }
    }

    fn print<H>(&mut self, host: &mut H) -> Result<DemoTick<N>, HostError>
    where
        H: EditorHost<Node = N>,
    {
        loop {
            let Some(line) = self.current.as_mut() else {
                if !self.next_line(host)? {
                    self.phase = DemoPhase::Done;
                    tracing::debug!(target: "hashmark::demo", "demo finished");
                    return Ok(DemoTick::Done);
                }
                continue;
            };

            if let Some(c) = line.remaining.pop_front() {
                let mut text = host.text_content(&line.element);
                text.push(c);
                host.set_text_content(&line.element, &text)?;
                return Ok(DemoTick::Wait(self.ms_per_character));
            }

            if line.convert {
                self.phase = DemoPhase::Paused;
                return Ok(DemoTick::Pause {
                    duration: self.pause_duration,
                    anchor: line.element.clone(),
                });
            }
            self.current = None;
        }
    }

    /// Start the next line. Returns false when none are left.
    fn next_line<H>(&mut self, host: &mut H) -> Result<bool, HostError>
    where
        H: EditorHost<Node = N>,
    {
        let Some(line) = self.lines.pop_front() else {
            return Ok(false);
        };

        let element = host.create_element(BlockTag::Paragraph.tag_name())?;
        let root = host.root();
        host.append_child(&root, &element)?;

        tracing::trace!(target: "hashmark::demo", text = %line.text, "typing line");

        self.current = Some(ActiveLine {
            element,
            remaining: line.text.chars().collect(),
            convert: line.convert,
        });
        Ok(true)
    }

    /// Convert the paused line as if the user had typed it.
    fn finish_pause<H>(&mut self, host: &mut H) -> Result<(), HostError>
    where
        H: EditorHost<Node = N>,
    {
        self.phase = DemoPhase::Printing;
        if let Some(line) = self.current.take() {
            self.converter
                .select_element(host, &line.element, CaretTarget::End)?;
            self.converter.test_for_triggers(host)?;
        }
        Ok(())
    }

    /// Run to completion without waiting. Used headless and in tests.
    pub fn run_to_end<H>(&mut self, host: &mut H) -> Result<usize, HostError>
    where
        H: EditorHost<Node = N>,
    {
        let mut steps = 0;
        while self.advance(host)? != DemoTick::Done {
            steps += 1;
        }
        Ok(steps)
    }
}
