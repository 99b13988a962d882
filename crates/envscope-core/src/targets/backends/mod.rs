mod vscode;

pub use vscode::VSCodeBackend;
