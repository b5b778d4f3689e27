// MODEL: Simulation state and scene data
pub mod ball;
pub mod camera;
pub mod obj;
pub mod scene;

pub use ball::BounceState;
pub use camera::OrbitCamera;
pub use obj::{load_obj, parse_obj, ObjError};
pub use scene::{Scene, SceneObject};
