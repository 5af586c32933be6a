/// Blocking, user-facing notifications (a browser `alert`, in the UI).
pub trait Notifier {
    fn alert(&self, message: &str);
}
