use crate::{Bitmap, Color, DocumentWriter, Error, Rect, Result, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    NewPage(usize),
    SetPage(usize),
    Image { page: usize, rect: Rect, pixels: (u32, u32) },
    Text { page: usize, text: String, x: f32, y: f32, style: TextStyle },
    Fill { page: usize, rect: Rect, color: Color },
    Outline { page: usize, rect: Rect },
}

/// Writer that records every command, for asserting on renderer output.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub commands: Vec<Command>,
    pages: usize,
    current: Option<usize>,
    fail_serialize: bool,
    fail_draw: bool,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_serialize() -> Self {
        Self {
            fail_serialize: true,
            ..Self::default()
        }
    }

    pub fn failing_draw() -> Self {
        Self {
            fail_draw: true,
            ..Self::default()
        }
    }

    fn page(&self) -> Result<usize> {
        self.current
            .ok_or_else(|| Error::Render("no page is open".into()))
    }

    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn images_on(&self, page: usize) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Image { page: p, rect, .. } if *p == page => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl DocumentWriter for RecordingWriter {
    fn new_page(&mut self) -> Result<usize> {
        let index = self.pages;
        self.pages += 1;
        self.current = Some(index);
        self.commands.push(Command::NewPage(index));
        Ok(index)
    }

    fn set_page(&mut self, index: usize) -> Result<()> {
        if index >= self.pages {
            return Err(Error::Render(format!("page {index} does not exist")));
        }
        self.current = Some(index);
        self.commands.push(Command::SetPage(index));
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn draw_image(&mut self, bitmap: &Bitmap, rect: Rect) -> Result<()> {
        let page = self.page()?;
        if self.fail_draw {
            return Err(Error::Render("recording writer refused image".into()));
        }
        self.commands.push(Command::Image {
            page,
            rect,
            pixels: (bitmap.width, bitmap.height),
        });
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<()> {
        let page = self.page()?;
        self.commands.push(Command::Text {
            page,
            text: text.to_owned(),
            x,
            y,
            style: *style,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        let page = self.page()?;
        self.commands.push(Command::Fill { page, rect, color });
        Ok(())
    }

    fn outline_rect(&mut self, rect: Rect, _color: Color) -> Result<()> {
        let page = self.page()?;
        self.commands.push(Command::Outline { page, rect });
        Ok(())
    }

    fn serialize(self) -> Result<Vec<u8>> {
        if self.fail_serialize {
            return Err(Error::Serialization("recording writer refused".into()));
        }
        Ok(format!("%REC {} pages {} commands", self.pages, self.commands.len()).into_bytes())
    }
}
