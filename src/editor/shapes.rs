use super::Editor;
use crate::element::{ObjectId, TextOptions, factory};

/// Creation commands. Each new object is centred on the workspace, selected
/// and recorded as one history entry.
impl Editor {
    pub fn add_circle(&mut self) -> ObjectId {
        let object = factory::create_circle(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_soft_rectangle(&mut self) -> ObjectId {
        let object = factory::create_soft_rectangle(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_rectangle(&mut self) -> ObjectId {
        let object = factory::create_rectangle(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_triangle(&mut self) -> ObjectId {
        let object = factory::create_triangle(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_inverse_triangle(&mut self) -> ObjectId {
        let object = factory::create_inverse_triangle(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_diamond(&mut self) -> ObjectId {
        let object = factory::create_diamond(&self.session.defaults);
        self.add_to_canvas(object)
    }

    pub fn add_text(&mut self, text: &str, options: &TextOptions) -> ObjectId {
        let object = factory::create_text(text, &self.session.defaults, options);
        self.add_to_canvas(object)
    }
}
