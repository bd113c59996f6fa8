use minijinja::{Environment, context};

const HOME: &str = "home.html";
const OUTPUT: &str = "output.html";

/// The pages of the front end, compiled into the binary.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(HOME, include_str!("../templates/home.html"))?;
        env.add_template(OUTPUT, include_str!("../templates/output.html"))?;
        Ok(Self { env })
    }

    /// The landing page with the measurements form.
    pub fn home(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(HOME)?.render(context! {})
    }

    /// The result page for a predicted `variety`.
    pub fn output(&self, variety: &str) -> Result<String, minijinja::Error> {
        self.env.get_template(OUTPUT)?.render(context! { variety })
    }
}
